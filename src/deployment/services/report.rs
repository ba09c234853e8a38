//! Result types produced by one reconciliation run.

use crate::deployment::{
    domain::{AgentId, Deployment, DeploymentId, Job, JobId, Method, RunId},
    ports::GatewayError,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

/// Step of the per-job pipeline at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// Deployment creation failed; nothing was created.
    Create,
    /// The deployment exists but its default methods were not initialised.
    InitMethods,
}

impl FailureStage {
    /// Returns the stage name used in logs and banners.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::InitMethods => "init_methods",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-job failure recorded for observability.
#[derive(Debug, Clone)]
pub struct JobFailure {
    /// Job whose pipeline failed.
    pub job_id: JobId,
    /// Failing step.
    pub stage: FailureStage,
    /// Gateway error returned by the step.
    pub error: GatewayError,
}

/// What happened to one pending job.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    /// The deployment was created and its methods initialised.
    Created {
        /// New deployment.
        deployment: Deployment,
        /// Initialised methods.
        methods: Vec<Method>,
    },
    /// The deployment was created but method initialisation failed.
    CreatedWithoutMethods {
        /// New deployment.
        deployment: Deployment,
        /// Initialisation error.
        error: GatewayError,
    },
    /// Another caller had already created the deployment.
    ///
    /// Holds the deployment when the follow-up lookup found it.
    AlreadyDeployed {
        /// Deployment recovered by lookup, if any.
        deployment: Option<Deployment>,
    },
    /// Deployment creation failed.
    Failed {
        /// Creation error.
        error: GatewayError,
    },
}

impl JobOutcome {
    /// Returns the deployment this outcome contributes to the merged list.
    #[must_use]
    pub const fn deployment(&self) -> Option<&Deployment> {
        match self {
            Self::Created { deployment, .. } | Self::CreatedWithoutMethods { deployment, .. } => {
                Some(deployment)
            }
            Self::AlreadyDeployed { deployment } => deployment.as_ref(),
            Self::Failed { .. } => None,
        }
    }

    /// Returns `true` when this run created the deployment.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(
            self,
            Self::Created { .. } | Self::CreatedWithoutMethods { .. }
        )
    }

    /// Returns the failure to report, if any.
    #[must_use]
    pub fn failure(&self, job_id: JobId) -> Option<JobFailure> {
        match self {
            Self::CreatedWithoutMethods { error, .. } => Some(JobFailure {
                job_id,
                stage: FailureStage::InitMethods,
                error: error.clone(),
            }),
            Self::Failed { error } => Some(JobFailure {
                job_id,
                stage: FailureStage::Create,
                error: error.clone(),
            }),
            Self::Created { .. } | Self::AlreadyDeployed { .. } => None,
        }
    }
}

/// Outcome for one pending job.
#[derive(Debug, Clone)]
pub struct JobReconciliation {
    /// Reconciled job.
    pub job_id: JobId,
    /// What happened.
    pub outcome: JobOutcome,
}

/// Caller-owned result of a reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconciliationReport {
    pub(super) run_id: RunId,
    pub(super) agent_id: AgentId,
    pub(super) jobs: Vec<Job>,
    pub(super) deployments: Vec<Deployment>,
    pub(super) outcomes: Vec<JobReconciliation>,
    pub(super) deployments_fetch_error: Option<GatewayError>,
    pub(super) started_at: DateTime<Utc>,
    pub(super) finished_at: DateTime<Utc>,
}

impl ReconciliationReport {
    /// Returns the run identifier used in log events.
    #[must_use]
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns the reconciled agent.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Returns the jobs fetched at the start of the run.
    #[must_use]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Returns the merged deployment list, at most one per job.
    #[must_use]
    pub fn deployments(&self) -> &[Deployment] {
        &self.deployments
    }

    /// Consumes the report, returning the merged deployment list.
    #[must_use]
    pub fn into_deployments(self) -> Vec<Deployment> {
        self.deployments
    }

    /// Returns per-job outcomes ordered by job identifier.
    #[must_use]
    pub fn outcomes(&self) -> &[JobReconciliation] {
        &self.outcomes
    }

    /// Returns the deployments created by this run.
    #[must_use]
    pub fn created(&self) -> Vec<&Deployment> {
        self.outcomes
            .iter()
            .filter(|entry| entry.outcome.is_created())
            .filter_map(|entry| entry.outcome.deployment())
            .collect()
    }

    /// Returns the per-job failures of this run.
    #[must_use]
    pub fn failures(&self) -> Vec<JobFailure> {
        self.outcomes
            .iter()
            .filter_map(|entry| entry.outcome.failure(entry.job_id))
            .collect()
    }

    /// Returns the jobs whose deployment creation failed.
    #[must_use]
    pub fn failed_job_ids(&self) -> Vec<JobId> {
        self.failures()
            .into_iter()
            .filter(|failure| failure.stage == FailureStage::Create)
            .map(|failure| failure.job_id)
            .collect()
    }

    /// Returns `true` when any job failed at any stage.
    #[must_use]
    pub fn is_partial_failure(&self) -> bool {
        self.outcomes
            .iter()
            .any(|entry| entry.outcome.failure(entry.job_id).is_some())
    }

    /// Returns the tolerated deployments fetch error, if the run started from
    /// an assumed-empty deployment list.
    #[must_use]
    pub const fn deployments_fetch_error(&self) -> Option<&GatewayError> {
        self.deployments_fetch_error.as_ref()
    }

    /// Returns the methods initialised during this run keyed by deployment.
    #[must_use]
    pub fn initialised_methods(&self) -> HashMap<DeploymentId, Vec<Method>> {
        self.outcomes
            .iter()
            .filter_map(|entry| match &entry.outcome {
                JobOutcome::Created {
                    deployment,
                    methods,
                } => Some((deployment.id(), methods.clone())),
                _ => None,
            })
            .collect()
    }

    /// Returns the run start time.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the run finish time.
    #[must_use]
    pub const fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }
}
