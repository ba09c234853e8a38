//! Service layer aligning an agent's deployments with its completed jobs.

use super::report::{JobOutcome, JobReconciliation, ReconciliationReport};
use crate::deployment::{
    domain::{AgentId, Deployment, Job, JobId, RunId},
    ports::{BackendGateway, GatewayError},
};
use futures::stream::{self, StreamExt};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Default number of per-job pipelines run concurrently.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Errors that abort a whole reconciliation run.
///
/// Per-job errors never abort the run; they are reported in
/// [`ReconciliationReport`].
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The job list could not be fetched.
    #[error("failed to list jobs for agent {agent_id}: {source}")]
    Jobs {
        /// Agent being reconciled.
        agent_id: AgentId,
        /// Gateway failure.
        #[source]
        source: GatewayError,
    },
}

/// Result type for reconciliation runs.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Returns the completed jobs that have no deployment, in job order and
/// without duplicates.
#[must_use]
pub fn pending_jobs(jobs: &[Job], deployments: &[Deployment]) -> Vec<JobId> {
    let mut seen: HashSet<JobId> = deployments.iter().map(Deployment::job_id).collect();
    jobs.iter()
        .filter(|job| job.is_completed())
        .map(Job::id)
        .filter(|job_id| seen.insert(*job_id))
        .collect()
}

/// Concatenates deployment lists keeping the first deployment seen for each
/// job.
fn merge_deployments<'a>(lists: impl IntoIterator<Item = &'a Deployment>) -> Vec<Deployment> {
    let mut seen = HashSet::new();
    lists
        .into_iter()
        .filter(|deployment| seen.insert(deployment.job_id()))
        .cloned()
        .collect()
}

/// Deployment reconciliation service.
///
/// Each run fetches the agent's jobs and deployments, creates a deployment
/// for every completed job that lacks one, initialises its default methods,
/// and returns the merged state. Runs share no mutable state, so rerunning
/// after a partial failure only retries the jobs that are still missing.
#[derive(Clone)]
pub struct DeploymentReconciler<G, C>
where
    G: BackendGateway,
    C: Clock + Send + Sync,
{
    gateway: Arc<G>,
    clock: Arc<C>,
    max_in_flight: usize,
}

impl<G, C> DeploymentReconciler<G, C>
where
    G: BackendGateway,
    C: Clock + Send + Sync,
{
    /// Creates a reconciler with [`DEFAULT_MAX_IN_FLIGHT`] concurrency.
    #[must_use]
    pub const fn new(gateway: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            gateway,
            clock,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Sets how many per-job pipelines may run at once (at least one).
    #[must_use]
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Returns the concurrency bound.
    #[must_use]
    pub const fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Reconciles the deployments of one agent.
    ///
    /// A failed deployments fetch is treated as an empty list. Conflicts on
    /// creation mean another caller deployed the job first and are not
    /// reported as failures.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Jobs`] when the job list cannot be fetched.
    pub async fn reconcile(&self, agent_id: AgentId) -> ReconcileResult<ReconciliationReport> {
        let run_id = RunId::new();
        let started_at = self.clock.utc();

        let (jobs_result, deployments_result) = tokio::join!(
            self.gateway.list_jobs(agent_id),
            self.gateway.list_deployments(agent_id)
        );
        let jobs = jobs_result.map_err(|source| ReconcileError::Jobs { agent_id, source })?;
        let (existing, deployments_fetch_error) = deployments_result.map_or_else(
            |err| {
                tracing::warn!(
                    %run_id,
                    %agent_id,
                    error = %err,
                    "deployments fetch failed, assuming none exist"
                );
                (Vec::new(), Some(err))
            },
            |deployments| (deployments, None),
        );

        let pending = pending_jobs(&jobs, &existing);
        tracing::info!(
            %run_id,
            %agent_id,
            jobs = jobs.len(),
            existing = existing.len(),
            pending = pending.len(),
            "reconciling deployments"
        );

        let mut outcomes: Vec<JobReconciliation> = stream::iter(pending)
            .map(|job_id| self.reconcile_job(run_id, job_id))
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await;
        outcomes.sort_by_key(|entry| entry.job_id);

        let deployments = merge_deployments(
            existing
                .iter()
                .chain(outcomes.iter().filter_map(|entry| entry.outcome.deployment())),
        );

        let report = ReconciliationReport {
            run_id,
            agent_id,
            jobs,
            deployments,
            outcomes,
            deployments_fetch_error,
            started_at,
            finished_at: self.clock.utc(),
        };
        tracing::info!(
            %run_id,
            %agent_id,
            deployments = report.deployments().len(),
            created = report.created().len(),
            failed = report.failures().len(),
            "reconciliation finished"
        );
        Ok(report)
    }

    /// Runs create-then-initialise for one job. Never fails; errors are
    /// captured in the outcome.
    async fn reconcile_job(&self, run_id: RunId, job_id: JobId) -> JobReconciliation {
        let outcome = match self.gateway.create_deployment(job_id).await {
            Ok(deployment) => self.initialise_methods(run_id, deployment).await,
            Err(err) if err.is_conflict() => self.recover_existing(run_id, job_id).await,
            Err(error) => {
                tracing::warn!(%run_id, %job_id, %error, "deployment creation failed");
                JobOutcome::Failed { error }
            }
        };
        JobReconciliation { job_id, outcome }
    }

    async fn initialise_methods(&self, run_id: RunId, deployment: Deployment) -> JobOutcome {
        let job_id = deployment.job_id();
        let deployment_id = deployment.id();
        tracing::info!(%run_id, %job_id, %deployment_id, "deployment created");
        match self.gateway.init_methods(&deployment).await {
            Ok(methods) => {
                tracing::info!(
                    %run_id,
                    %job_id,
                    %deployment_id,
                    methods = methods.len(),
                    "methods initialised"
                );
                JobOutcome::Created {
                    deployment,
                    methods,
                }
            }
            Err(error) => {
                tracing::warn!(
                    %run_id,
                    %job_id,
                    %deployment_id,
                    %error,
                    "method initialisation failed, keeping deployment"
                );
                JobOutcome::CreatedWithoutMethods { deployment, error }
            }
        }
    }

    /// Looks up a deployment another caller created. A failed lookup is
    /// logged and skipped.
    async fn recover_existing(&self, run_id: RunId, job_id: JobId) -> JobOutcome {
        let deployment = self
            .gateway
            .find_deployment(job_id)
            .await
            .unwrap_or_else(|error| {
                tracing::warn!(%run_id, %job_id, %error, "lookup after conflict failed");
                None
            });
        tracing::info!(
            %run_id,
            %job_id,
            recovered = deployment.is_some(),
            "job already deployed by another caller"
        );
        JobOutcome::AlreadyDeployed { deployment }
    }
}
