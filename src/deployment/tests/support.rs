//! Shared builders for deployment unit tests.

use crate::deployment::{
    adapters::memory::InMemoryBackendGateway,
    domain::{AgentId, Deployment, DeploymentId, DeploymentStatus, Job, JobId, JobStatus, Method},
};
use chrono::{TimeZone, Utc};

pub(super) fn agent() -> AgentId {
    AgentId::new(1).expect("valid agent id")
}

pub(super) fn job_id(value: u64) -> JobId {
    JobId::new(value).expect("valid job id")
}

pub(super) fn deployment_id(value: u64) -> DeploymentId {
    DeploymentId::new(value).expect("valid deployment id")
}

pub(super) fn job(id: u64, status: JobStatus) -> Job {
    let created_at = Utc
        .with_ymd_and_hms(2025, 1, 5, 0, 3, 7)
        .single()
        .expect("valid timestamp");
    Job::new(job_id(id), agent(), status, created_at)
}

pub(super) fn deployment(id: u64, job: u64, status: DeploymentStatus) -> Deployment {
    Deployment::new(deployment_id(id), job_id(job), status)
}

pub(super) fn default_methods() -> Vec<Method> {
    ["Summarize the ticket", "Draft a reply"]
        .into_iter()
        .map(|name| Method::new(name).expect("valid method"))
        .collect()
}

/// Gateway seeded with the given jobs and deployments.
pub(super) fn gateway_with(jobs: &[Job], deployments: &[Deployment]) -> InMemoryBackendGateway {
    let gateway = InMemoryBackendGateway::with_default_methods(default_methods());
    for seeded in jobs {
        gateway.seed_job(seeded.clone()).expect("seed job");
    }
    for seeded in deployments {
        gateway
            .seed_deployment(seeded.clone())
            .expect("seed deployment");
    }
    gateway
}
