//! Backend gateway port for jobs, deployments, and methods.

use crate::deployment::domain::{AgentId, Deployment, Job, JobId, Method};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for backend gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Contract for the REST backend that owns jobs and deployments.
///
/// Reads are idempotent and writes are at-least-once. Implementations do not
/// retry; errors reach the caller unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Lists the fine-tuning jobs of an agent.
    async fn list_jobs(&self, agent_id: AgentId) -> GatewayResult<Vec<Job>>;

    /// Lists the deployments of an agent.
    async fn list_deployments(&self, agent_id: AgentId) -> GatewayResult<Vec<Deployment>>;

    /// Creates the deployment for a job.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Conflict`] when the job already has a
    /// deployment and [`GatewayError::NotFound`] when the job is unknown.
    async fn create_deployment(&self, job_id: JobId) -> GatewayResult<Deployment>;

    /// Initialises the default methods of a deployment, replacing any
    /// existing set. Re-invoking yields the same set.
    async fn init_methods(&self, deployment: &Deployment) -> GatewayResult<Vec<Method>>;

    /// Finds the deployment of a job.
    ///
    /// Returns `None` when the job has no deployment.
    async fn find_deployment(&self, job_id: JobId) -> GatewayResult<Option<Deployment>>;

    /// Lists the methods of a job's deployment.
    async fn list_methods(&self, job_id: JobId) -> GatewayResult<Vec<Method>>;
}

/// Errors returned by backend gateway adapters.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The referenced job or deployment does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The bearer token was rejected or lacks permission.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The response body did not match the canonical schema.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Transport failure or timeout.
    #[error("network error: {0}")]
    Network(Arc<dyn std::error::Error + Send + Sync>),

    /// Any other unsuccessful response.
    #[error("unexpected backend response ({status}): {message}")]
    Unknown {
        /// HTTP status code.
        status: u16,
        /// Backend-provided message.
        message: String,
    },
}

impl GatewayError {
    /// Wraps a transport error.
    #[must_use]
    pub fn network(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Network(Arc::new(err))
    }

    /// Returns `true` for duplicate-creation errors.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Returns `true` for missing-resource errors.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
