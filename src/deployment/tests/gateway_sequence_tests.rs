//! Call-ordering tests for the reconciler using a mocked gateway.

use std::sync::Arc;

use super::support::{agent, default_methods, deployment, job, job_id};
use crate::deployment::{
    domain::{DeploymentStatus, JobStatus},
    ports::{GatewayError, MockBackendGateway},
    services::{DeploymentReconciler, FailureStage},
};
use mockable::DefaultClock;
use mockall::{Sequence, predicate::eq};
use rstest::rstest;

fn listing(mock: &mut MockBackendGateway, job_ids: &[u64]) {
    let jobs: Vec<_> = job_ids
        .iter()
        .map(|id| job(*id, JobStatus::Completed))
        .collect();
    mock.expect_list_jobs()
        .times(1)
        .returning(move |_| Ok(jobs.clone()));
    mock.expect_list_deployments()
        .times(1)
        .returning(|_| Ok(Vec::new()));
}

fn reconciler(mock: MockBackendGateway) -> DeploymentReconciler<MockBackendGateway, DefaultClock> {
    DeploymentReconciler::new(Arc::new(mock), Arc::new(DefaultClock))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn methods_are_initialised_after_creation() {
    let mut mock = MockBackendGateway::new();
    let mut seq = Sequence::new();
    listing(&mut mock, &[1]);
    mock.expect_create_deployment()
        .with(eq(job_id(1)))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(deployment(30, 1, DeploymentStatus::Inactive)));
    mock.expect_init_methods()
        .withf(|created| created.id().value() == 30)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(default_methods()));

    let report = reconciler(mock)
        .reconcile(agent())
        .await
        .expect("reconciliation should succeed");

    assert_eq!(report.created().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_creation_skips_initialisation() {
    let mut mock = MockBackendGateway::new();
    listing(&mut mock, &[2]);
    mock.expect_create_deployment()
        .times(1)
        .returning(|_| Err(GatewayError::NotFound("job 2 not found".to_owned())));
    mock.expect_init_methods().never();

    let report = reconciler(mock)
        .reconcile(agent())
        .await
        .expect("reconciliation should succeed");

    let failures = report.failures();
    let failure = failures.first().expect("one failure");
    assert_eq!(failure.stage, FailureStage::Create);
    assert!(failure.error.is_not_found());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conflict_triggers_lookup_instead_of_initialisation() {
    let mut mock = MockBackendGateway::new();
    let mut seq = Sequence::new();
    listing(&mut mock, &[5]);
    mock.expect_create_deployment()
        .with(eq(job_id(5)))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(GatewayError::Conflict("already exists".to_owned())));
    mock.expect_find_deployment()
        .with(eq(job_id(5)))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(Some(deployment(31, 5, DeploymentStatus::Active))));
    mock.expect_init_methods().never();

    let report = reconciler(mock)
        .reconcile(agent())
        .await
        .expect("reconciliation should succeed");

    assert!(!report.is_partial_failure());
    assert_eq!(
        report.deployments(),
        [deployment(31, 5, DeploymentStatus::Active)].as_slice()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_lookup_after_conflict_is_not_a_failure() {
    let mut mock = MockBackendGateway::new();
    listing(&mut mock, &[6]);
    mock.expect_create_deployment()
        .returning(|_| Err(GatewayError::Conflict("already exists".to_owned())));
    mock.expect_find_deployment()
        .returning(|_| Err(GatewayError::Unauthorized("expired".to_owned())));

    let report = reconciler(mock)
        .reconcile(agent())
        .await
        .expect("reconciliation should succeed");

    assert!(!report.is_partial_failure());
    assert!(report.deployments().is_empty());
}
