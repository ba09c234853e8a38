//! Pure projection of reconciled deployments into display rows.

use super::locale::{MISSING_TIMESTAMP, ViewOptions};
use crate::deployment::{
    domain::{Deployment, DeploymentId, DeploymentStatus, Job, JobId, Method},
    services::{DeploymentDetail, FailureStage, ReconciliationReport},
};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

/// Endpoint text shown before the backend assigns one.
pub const PENDING_ENDPOINT: &str = "pending";

/// Badge style for a deployment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeVariant {
    /// Outlined badge for serving deployments.
    Outline,
    /// Muted badge for idle deployments.
    Secondary,
}

impl BadgeVariant {
    /// Returns the variant name understood by the badge component.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outline => "outline",
            Self::Secondary => "secondary",
        }
    }
}

impl From<DeploymentStatus> for BadgeVariant {
    fn from(status: DeploymentStatus) -> Self {
        match status {
            DeploymentStatus::Active => Self::Outline,
            DeploymentStatus::Inactive => Self::Secondary,
        }
    }
}

impl fmt::Display for BadgeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One display-ready deployment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    /// Deployment identifier.
    pub deployment_id: DeploymentId,
    /// Served job.
    pub job_id: JobId,
    /// Status text.
    pub status: String,
    /// Badge style for the status.
    pub badge: BadgeVariant,
    /// Endpoint URL or [`PENDING_ENDPOINT`].
    pub endpoint: String,
    /// Status of the served job, when the job is known.
    pub job_status: Option<String>,
    /// Job creation time or [`MISSING_TIMESTAMP`].
    pub created_at: String,
    /// Job finish time or [`MISSING_TIMESTAMP`].
    pub finished_at: String,
    /// Method labels exposed by the deployment.
    pub methods: Vec<String>,
}

/// Display data for the single-deployment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// Row for the deployment, with methods filled in.
    pub row: ViewRow,
    /// Training data path of the served job, when known.
    pub training_file_path: Option<String>,
}

/// Returns method labels in their stored order.
#[must_use]
pub fn method_names(methods: &[Method]) -> Vec<String> {
    methods.iter().map(|method| method.name().to_owned()).collect()
}

fn project_row(deployment: &Deployment, job: Option<&Job>, options: &ViewOptions) -> ViewRow {
    ViewRow {
        deployment_id: deployment.id(),
        job_id: deployment.job_id(),
        status: deployment.status().as_str().to_owned(),
        badge: BadgeVariant::from(deployment.status()),
        endpoint: deployment
            .endpoint()
            .map_or_else(|| PENDING_ENDPOINT.to_owned(), |endpoint| endpoint.to_string()),
        job_status: job.map(|found| found.status().as_str().to_owned()),
        created_at: job.map_or_else(
            || MISSING_TIMESTAMP.to_owned(),
            |found| options.format_timestamp(found.created_at()),
        ),
        finished_at: options.format_optional(job.and_then(Job::finished_at)),
        methods: Vec::new(),
    }
}

/// Projects deployments into rows sorted by job, newest first.
///
/// Each row takes its timestamps from the matching job; rows whose job is
/// not in `jobs` show placeholders.
#[must_use]
pub fn project(deployments: &[Deployment], jobs: &[Job], options: &ViewOptions) -> Vec<ViewRow> {
    project_with_methods(deployments, jobs, &HashMap::new(), options)
}

/// Projects deployments as [`project`] does, attaching the method labels
/// known for each deployment.
#[must_use]
pub fn project_with_methods<S: std::hash::BuildHasher>(
    deployments: &[Deployment],
    jobs: &[Job],
    methods: &HashMap<DeploymentId, Vec<Method>, S>,
    options: &ViewOptions,
) -> Vec<ViewRow> {
    let jobs_by_id: HashMap<JobId, &Job> = jobs.iter().map(|job| (job.id(), job)).collect();
    let mut rows: Vec<ViewRow> = deployments
        .iter()
        .map(|deployment| {
            let mut row = project_row(
                deployment,
                jobs_by_id.get(&deployment.job_id()).copied(),
                options,
            );
            if let Some(known) = methods.get(&deployment.id()) {
                row.methods = method_names(known);
            }
            row
        })
        .collect();
    rows.sort_by_key(|row| (Reverse(row.job_id), Reverse(row.deployment_id)));
    rows
}

/// Projects the reconciled state of a report, including methods initialised
/// during the run.
#[must_use]
pub fn project_report(report: &ReconciliationReport, options: &ViewOptions) -> Vec<ViewRow> {
    project_with_methods(
        report.deployments(),
        report.jobs(),
        &report.initialised_methods(),
        options,
    )
}

/// Projects a loaded deployment detail.
#[must_use]
pub fn project_detail(
    detail: &DeploymentDetail,
    job: Option<&Job>,
    options: &ViewOptions,
) -> DetailView {
    let mut row = project_row(&detail.deployment, job, options);
    row.methods = method_names(&detail.methods);
    DetailView {
        row,
        training_file_path: job
            .and_then(Job::training_file_path)
            .map(str::to_owned),
    }
}

fn join_ids(ids: &[JobId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the partial-failure banner text, or `None` when every pending
/// job was reconciled.
#[must_use]
pub fn failure_banner(report: &ReconciliationReport) -> Option<String> {
    let failures = report.failures();
    if failures.is_empty() {
        return None;
    }
    let ids_at = |stage: FailureStage| -> Vec<JobId> {
        failures
            .iter()
            .filter(|failure| failure.stage == stage)
            .map(|failure| failure.job_id)
            .collect()
    };

    let mut parts = Vec::new();
    let create_failed = ids_at(FailureStage::Create);
    if !create_failed.is_empty() {
        parts.push(format!(
            "Failed to create deployments for jobs {}.",
            join_ids(&create_failed)
        ));
    }
    let init_failed = ids_at(FailureStage::InitMethods);
    if !init_failed.is_empty() {
        parts.push(format!(
            "Default methods could not be initialised for jobs {}.",
            join_ids(&init_failed)
        ));
    }
    Some(parts.join(" "))
}
