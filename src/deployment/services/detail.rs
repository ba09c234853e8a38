//! Service layer for the single-deployment view.

use crate::deployment::{
    domain::{Deployment, JobId, Method},
    ports::{BackendGateway, GatewayError},
};
use std::sync::Arc;
use thiserror::Error;

/// A deployment together with its current methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentDetail {
    /// The job's deployment.
    pub deployment: Deployment,
    /// Methods currently exposed by the deployment.
    pub methods: Vec<Method>,
}

/// Service-level errors for deployment detail operations.
#[derive(Debug, Error)]
pub enum DetailError {
    /// The job has no deployment yet.
    #[error("job {0} has no deployment")]
    NotDeployed(JobId),
    /// Gateway operation failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Result type for deployment detail operations.
pub type DetailResult<T> = Result<T, DetailError>;

/// Loads and maintains the deployment of a single job.
#[derive(Clone)]
pub struct DeploymentDetailService<G>
where
    G: BackendGateway,
{
    gateway: Arc<G>,
}

impl<G> DeploymentDetailService<G>
where
    G: BackendGateway,
{
    /// Creates a new detail service.
    #[must_use]
    pub const fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    async fn find_or_error(&self, job_id: JobId) -> DetailResult<Deployment> {
        self.gateway
            .find_deployment(job_id)
            .await?
            .ok_or(DetailError::NotDeployed(job_id))
    }

    /// Loads a job's deployment and methods.
    ///
    /// A failed methods fetch degrades to an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`DetailError::NotDeployed`] when the job has no deployment,
    /// or gateway errors from the deployment lookup.
    pub async fn load(&self, job_id: JobId) -> DetailResult<DeploymentDetail> {
        let deployment = self.find_or_error(job_id).await?;
        let methods = self
            .gateway
            .list_methods(job_id)
            .await
            .unwrap_or_else(|error| {
                tracing::warn!(%job_id, %error, "methods fetch failed, assuming none");
                Vec::new()
            });
        Ok(DeploymentDetail {
            deployment,
            methods,
        })
    }

    /// Replaces a deployment's methods with the default set.
    ///
    /// # Errors
    ///
    /// Returns [`DetailError::NotDeployed`] when the job has no deployment,
    /// or gateway errors from lookup and initialisation.
    pub async fn reset_methods(&self, job_id: JobId) -> DetailResult<DeploymentDetail> {
        let deployment = self.find_or_error(job_id).await?;
        let methods = self.gateway.init_methods(&deployment).await?;
        tracing::info!(
            %job_id,
            deployment_id = %deployment.id(),
            methods = methods.len(),
            "methods reset to defaults"
        );
        Ok(DeploymentDetail {
            deployment,
            methods,
        })
    }
}
