//! Then steps for deployment reconciliation BDD scenarios.

use super::world::{ReconciliationWorld, job_id};
use agenthub::deployment::view::failure_banner;
use rstest_bdd_macros::then;

fn deployments_for(world: &ReconciliationWorld, job: u64) -> Result<usize, eyre::Report> {
    let target = job_id(job)?;
    Ok(world
        .last_report()?
        .deployments()
        .iter()
        .filter(|deployment| deployment.job_id() == target)
        .count())
}

#[then("job {job:u64} has exactly one deployment")]
fn exactly_one_deployment(world: &ReconciliationWorld, job: u64) -> Result<(), eyre::Report> {
    let count = deployments_for(world, job)?;
    if count != 1 {
        return Err(eyre::eyre!("expected one deployment for job {job}, found {count}"));
    }
    Ok(())
}

#[then("job {job:u64} has no deployment")]
fn no_deployment(world: &ReconciliationWorld, job: u64) -> Result<(), eyre::Report> {
    let count = deployments_for(world, job)?;
    if count != 0 {
        return Err(eyre::eyre!("expected no deployment for job {job}, found {count}"));
    }
    Ok(())
}

#[then("no job failed")]
fn no_job_failed(world: &ReconciliationWorld) -> Result<(), eyre::Report> {
    let report = world.last_report()?;
    if report.is_partial_failure() {
        return Err(eyre::eyre!("unexpected failures: {:?}", report.failures()));
    }
    Ok(())
}

#[then("the result lists only deployment {deployment:u64}")]
fn only_deployment(world: &ReconciliationWorld, deployment: u64) -> Result<(), eyre::Report> {
    let listed: Vec<u64> = world
        .last_report()?
        .deployments()
        .iter()
        .map(|found| found.id().value())
        .collect();
    if listed != [deployment] {
        return Err(eyre::eyre!("expected only deployment {deployment}, got {listed:?}"));
    }
    Ok(())
}

#[then("no deployment was created")]
fn nothing_created(world: &ReconciliationWorld) -> Result<(), eyre::Report> {
    let creations = world.creations()?;
    if !creations.is_empty() {
        return Err(eyre::eyre!("expected no creation calls, got {creations:?}"));
    }
    Ok(())
}

#[then(r#"the banner reads "{text}""#)]
fn banner_reads(world: &ReconciliationWorld, text: String) -> Result<(), eyre::Report> {
    let banner = failure_banner(world.last_report()?);
    if banner.as_deref() != Some(text.as_str()) {
        return Err(eyre::eyre!("expected banner {text:?}, got {banner:?}"));
    }
    Ok(())
}

#[then("the second run created no deployments")]
fn second_run_created_nothing(world: &ReconciliationWorld) -> Result<(), eyre::Report> {
    let created = world.last_report()?.created().len();
    if world.reports.len() != 2 || created != 0 {
        return Err(eyre::eyre!(
            "expected two runs with nothing created on the second, got {} runs and {created} created",
            world.reports.len()
        ));
    }
    Ok(())
}

#[then("both runs list the same deployments")]
fn runs_agree(world: &ReconciliationWorld) -> Result<(), eyre::Report> {
    let [first, second] = world.reports.as_slice() else {
        return Err(eyre::eyre!("expected exactly two runs"));
    };
    if first.deployments() != second.deployments() {
        return Err(eyre::eyre!(
            "deployments differ: {:?} vs {:?}",
            first.deployments(),
            second.deployments()
        ));
    }
    Ok(())
}
