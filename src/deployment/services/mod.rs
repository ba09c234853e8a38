//! Application services for deployment reconciliation and detail views.

mod detail;
mod reconciler;
mod report;

pub use detail::{DeploymentDetail, DeploymentDetailService, DetailError, DetailResult};
pub use reconciler::{
    DEFAULT_MAX_IN_FLIGHT, DeploymentReconciler, ReconcileError, ReconcileResult, pending_jobs,
};
pub use report::{FailureStage, JobFailure, JobOutcome, JobReconciliation, ReconciliationReport};
