//! Shared world state for deployment reconciliation BDD scenarios.

use std::sync::Arc;

use agenthub::deployment::{
    adapters::memory::{GatewayOperation, InMemoryBackendGateway},
    domain::{AgentId, JobId, Method},
    services::{DeploymentReconciler, ReconciliationReport},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Reconciler type used by the BDD world.
pub type TestReconciler = DeploymentReconciler<InMemoryBackendGateway, DefaultClock>;

/// Scenario world for deployment reconciliation behaviour tests.
pub struct ReconciliationWorld {
    /// Backend double shared with the reconciler.
    pub gateway: InMemoryBackendGateway,
    /// The reconciler under test.
    pub reconciler: TestReconciler,
    /// Agent owning every seeded job.
    pub agent_id: AgentId,
    /// Reports of completed runs, oldest first.
    pub reports: Vec<ReconciliationReport>,
}

impl ReconciliationWorld {
    /// Creates a world with an empty backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the fixed agent or method values are invalid.
    pub fn new() -> Result<Self, eyre::Report> {
        let methods = vec![Method::new("Answer questions")?];
        let gateway = InMemoryBackendGateway::with_default_methods(methods);
        let reconciler =
            DeploymentReconciler::new(Arc::new(gateway.clone()), Arc::new(DefaultClock));
        Ok(Self {
            gateway,
            reconciler,
            agent_id: AgentId::new(1)?,
            reports: Vec::new(),
        })
    }

    /// Returns the most recent report.
    ///
    /// # Errors
    ///
    /// Returns an error when no run has completed.
    pub fn last_report(&self) -> Result<&ReconciliationReport, eyre::Report> {
        self.reports
            .last()
            .ok_or_else(|| eyre::eyre!("no reconciliation run in scenario world"))
    }

    /// Returns the jobs passed to deployment creation so far.
    ///
    /// # Errors
    ///
    /// Returns an error when the gateway journal cannot be read.
    pub fn creations(&self) -> Result<Vec<JobId>, eyre::Report> {
        Ok(self
            .gateway
            .jobs_called(GatewayOperation::CreateDeployment)?)
    }
}

/// Fixture that creates a new scenario world.
///
/// # Panics
///
/// Panics when the world cannot be built from its fixed values.
#[fixture]
pub fn world() -> ReconciliationWorld {
    ReconciliationWorld::new().unwrap_or_else(|err| panic!("scenario world: {err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a job identifier from step text.
///
/// # Errors
///
/// Returns an error when the identifier is zero.
pub fn job_id(value: u64) -> Result<JobId, eyre::Report> {
    Ok(JobId::new(value)?)
}
