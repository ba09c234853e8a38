//! Given steps for deployment reconciliation BDD scenarios.

use super::world::{ReconciliationWorld, job_id};
use agenthub::deployment::{
    adapters::memory::GatewayOperation,
    domain::{Deployment, DeploymentId, DeploymentStatus, Job, JobStatus},
    ports::GatewayError,
};
use chrono::Utc;
use eyre::WrapErr;
use rstest_bdd_macros::given;

fn seed_job(world: &ReconciliationWorld, id: u64, status: JobStatus) -> Result<(), eyre::Report> {
    let job = Job::new(job_id(id)?, world.agent_id, status, Utc::now());
    world.gateway.seed_job(job).wrap_err("seed job")?;
    Ok(())
}

fn seed_deployment(
    world: &ReconciliationWorld,
    deployment: u64,
    job: u64,
) -> Result<(), eyre::Report> {
    let seeded = Deployment::new(
        DeploymentId::new(deployment)?,
        job_id(job)?,
        DeploymentStatus::Active,
    );
    world
        .gateway
        .seed_deployment(seeded)
        .wrap_err("seed deployment")?;
    Ok(())
}

#[given("a completed job {id:u64}")]
fn a_completed_job(world: &mut ReconciliationWorld, id: u64) -> Result<(), eyre::Report> {
    seed_job(world, id, JobStatus::Completed)
}

#[given("a running job {id:u64}")]
fn a_running_job(world: &mut ReconciliationWorld, id: u64) -> Result<(), eyre::Report> {
    seed_job(world, id, JobStatus::Running)
}

#[given("job {job:u64} already has deployment {deployment:u64}")]
fn job_already_deployed(
    world: &mut ReconciliationWorld,
    job: u64,
    deployment: u64,
) -> Result<(), eyre::Report> {
    seed_deployment(world, deployment, job)
}

/// The deployment exists on the backend but the deployments listing fails,
/// so the run only learns about it from the creation conflict.
#[given("job {job:u64} was deployed by another caller")]
fn deployed_by_another_caller(world: &mut ReconciliationWorld, job: u64) -> Result<(), eyre::Report> {
    seed_deployment(world, 100 + job, job)?;
    world
        .gateway
        .fail(
            GatewayOperation::ListDeployments,
            None,
            GatewayError::Unknown {
                status: 503,
                message: "listing unavailable".to_owned(),
            },
        )
        .wrap_err("inject listing failure")?;
    Ok(())
}

#[given("creating a deployment for job {job:u64} fails")]
fn creation_fails(world: &mut ReconciliationWorld, job: u64) -> Result<(), eyre::Report> {
    world
        .gateway
        .fail(
            GatewayOperation::CreateDeployment,
            Some(job_id(job)?),
            GatewayError::Unknown {
                status: 500,
                message: "deployment service unavailable".to_owned(),
            },
        )
        .wrap_err("inject creation failure")?;
    Ok(())
}
