//! In-memory backend gateway for reconciliation tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::deployment::{
    domain::{AgentId, Deployment, DeploymentId, DeploymentStatus, Job, JobId, Method},
    ports::{BackendGateway, GatewayError, GatewayResult},
};

/// Gateway operation names used for failure injection and the call journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    /// [`BackendGateway::list_jobs`].
    ListJobs,
    /// [`BackendGateway::list_deployments`].
    ListDeployments,
    /// [`BackendGateway::create_deployment`].
    CreateDeployment,
    /// [`BackendGateway::init_methods`].
    InitMethods,
    /// [`BackendGateway::find_deployment`].
    FindDeployment,
    /// [`BackendGateway::list_methods`].
    ListMethods,
}

/// One recorded gateway invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayCall {
    /// Invoked operation.
    pub operation: GatewayOperation,
    /// Job the call concerned, for job-scoped operations.
    pub job_id: Option<JobId>,
}

/// Thread-safe in-memory stand-in for the REST backend.
///
/// Mirrors the backend's rules: one deployment per job, conflicts on
/// duplicate creation, not-found for unknown jobs. Failures can be injected
/// per operation, optionally scoped to a single job, and stay active until
/// cleared.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackendGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    jobs: BTreeMap<JobId, Job>,
    deployments: BTreeMap<JobId, Deployment>,
    methods: HashMap<DeploymentId, Vec<Method>>,
    default_methods: Vec<Method>,
    last_deployment_id: u64,
    failures: HashMap<(GatewayOperation, Option<JobId>), GatewayError>,
    calls: Vec<GatewayCall>,
}

fn lock_error(err: impl std::fmt::Display) -> GatewayError {
    GatewayError::network(std::io::Error::other(err.to_string()))
}

impl InMemoryBackendGateway {
    /// Creates an empty gateway with no default methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty gateway that initialises deployments with the given
    /// methods.
    #[must_use]
    pub fn with_default_methods(methods: Vec<Method>) -> Self {
        let gateway = Self::default();
        if let Ok(mut state) = gateway.state.write() {
            state.default_methods = methods;
        }
        gateway
    }

    fn read(&self) -> GatewayResult<RwLockReadGuard<'_, InMemoryGatewayState>> {
        self.state.read().map_err(lock_error)
    }

    fn write(&self) -> GatewayResult<RwLockWriteGuard<'_, InMemoryGatewayState>> {
        self.state.write().map_err(lock_error)
    }

    /// Adds or replaces a job.
    ///
    /// # Errors
    ///
    /// Returns a network error when lock acquisition fails.
    pub fn seed_job(&self, job: Job) -> GatewayResult<()> {
        let mut state = self.write()?;
        state.jobs.insert(job.id(), job);
        Ok(())
    }

    /// Adds or replaces a deployment, bypassing creation rules.
    ///
    /// # Errors
    ///
    /// Returns a network error when lock acquisition fails.
    pub fn seed_deployment(&self, deployment: Deployment) -> GatewayResult<()> {
        let mut state = self.write()?;
        state.last_deployment_id = state.last_deployment_id.max(deployment.id().value());
        state.deployments.insert(deployment.job_id(), deployment);
        Ok(())
    }

    /// Makes `operation` fail with `error`, for every job when `job_id` is
    /// `None` or only for that job otherwise.
    ///
    /// # Errors
    ///
    /// Returns a network error when lock acquisition fails.
    pub fn fail(
        &self,
        operation: GatewayOperation,
        job_id: Option<JobId>,
        error: GatewayError,
    ) -> GatewayResult<()> {
        let mut state = self.write()?;
        state.failures.insert((operation, job_id), error);
        Ok(())
    }

    /// Removes all injected failures.
    ///
    /// # Errors
    ///
    /// Returns a network error when lock acquisition fails.
    pub fn clear_failures(&self) -> GatewayResult<()> {
        let mut state = self.write()?;
        state.failures.clear();
        Ok(())
    }

    /// Returns every recorded call in invocation order.
    ///
    /// # Errors
    ///
    /// Returns a network error when lock acquisition fails.
    pub fn calls(&self) -> GatewayResult<Vec<GatewayCall>> {
        Ok(self.read()?.calls.clone())
    }

    /// Returns the jobs passed to `operation`, in invocation order.
    ///
    /// # Errors
    ///
    /// Returns a network error when lock acquisition fails.
    pub fn jobs_called(&self, operation: GatewayOperation) -> GatewayResult<Vec<JobId>> {
        Ok(self
            .read()?
            .calls
            .iter()
            .filter(|call| call.operation == operation)
            .filter_map(|call| call.job_id)
            .collect())
    }

    /// Returns the stored deployments ordered by job.
    ///
    /// # Errors
    ///
    /// Returns a network error when lock acquisition fails.
    pub fn deployments(&self) -> GatewayResult<Vec<Deployment>> {
        Ok(self.read()?.deployments.values().cloned().collect())
    }

    /// Returns the methods stored for a deployment.
    ///
    /// # Errors
    ///
    /// Returns a network error when lock acquisition fails.
    pub fn methods_for(&self, deployment_id: DeploymentId) -> GatewayResult<Vec<Method>> {
        Ok(self
            .read()?
            .methods
            .get(&deployment_id)
            .cloned()
            .unwrap_or_default())
    }

    /// Records the call and returns the injected failure, if any.
    fn enter(&self, operation: GatewayOperation, job_id: Option<JobId>) -> GatewayResult<()> {
        let mut state = self.write()?;
        state.calls.push(GatewayCall { operation, job_id });
        let scoped = job_id.and_then(|id| state.failures.get(&(operation, Some(id))));
        scoped
            .or_else(|| state.failures.get(&(operation, None)))
            .map_or(Ok(()), |error| Err(error.clone()))
    }
}

impl InMemoryGatewayState {
    fn agent_owns(&self, agent_id: AgentId, job_id: JobId) -> bool {
        self.jobs
            .get(&job_id)
            .is_some_and(|job| job.agent_id() == agent_id)
    }
}

#[async_trait]
impl BackendGateway for InMemoryBackendGateway {
    async fn list_jobs(&self, agent_id: AgentId) -> GatewayResult<Vec<Job>> {
        self.enter(GatewayOperation::ListJobs, None)?;
        let state = self.read()?;
        Ok(state
            .jobs
            .values()
            .filter(|job| job.agent_id() == agent_id)
            .cloned()
            .collect())
    }

    async fn list_deployments(&self, agent_id: AgentId) -> GatewayResult<Vec<Deployment>> {
        self.enter(GatewayOperation::ListDeployments, None)?;
        let state = self.read()?;
        Ok(state
            .deployments
            .values()
            .filter(|deployment| state.agent_owns(agent_id, deployment.job_id()))
            .cloned()
            .collect())
    }

    async fn create_deployment(&self, job_id: JobId) -> GatewayResult<Deployment> {
        self.enter(GatewayOperation::CreateDeployment, Some(job_id))?;
        let mut state = self.write()?;
        let job = state
            .jobs
            .get(&job_id)
            .ok_or_else(|| GatewayError::NotFound(format!("job {job_id} not found")))?;
        if !job.is_completed() {
            return Err(GatewayError::Unknown {
                status: 400,
                message: format!("job {job_id} is {} and cannot be deployed", job.status()),
            });
        }
        if state.deployments.contains_key(&job_id) {
            return Err(GatewayError::Conflict(format!(
                "deployment for job {job_id} already exists"
            )));
        }

        let next_id = state.last_deployment_id.saturating_add(1);
        let deployment_id = DeploymentId::new(next_id)
            .map_err(|err| GatewayError::InvalidPayload(err.to_string()))?;
        state.last_deployment_id = next_id;
        let deployment = Deployment::new(deployment_id, job_id, DeploymentStatus::Inactive);
        state.deployments.insert(job_id, deployment.clone());
        Ok(deployment)
    }

    async fn init_methods(&self, deployment: &Deployment) -> GatewayResult<Vec<Method>> {
        self.enter(GatewayOperation::InitMethods, Some(deployment.job_id()))?;
        let mut state = self.write()?;
        let stored_id = state
            .deployments
            .get(&deployment.job_id())
            .map(Deployment::id)
            .ok_or_else(|| {
                GatewayError::NotFound(format!(
                    "deployment for job {} not found, create deployment first",
                    deployment.job_id()
                ))
            })?;
        let methods = state.default_methods.clone();
        state.methods.insert(stored_id, methods.clone());
        Ok(methods)
    }

    async fn find_deployment(&self, job_id: JobId) -> GatewayResult<Option<Deployment>> {
        self.enter(GatewayOperation::FindDeployment, Some(job_id))?;
        Ok(self.read()?.deployments.get(&job_id).cloned())
    }

    async fn list_methods(&self, job_id: JobId) -> GatewayResult<Vec<Method>> {
        self.enter(GatewayOperation::ListMethods, Some(job_id))?;
        let state = self.read()?;
        let deployment = state.deployments.get(&job_id).ok_or_else(|| {
            GatewayError::NotFound(format!("deployment for job {job_id} not found"))
        })?;
        Ok(state
            .methods
            .get(&deployment.id())
            .cloned()
            .unwrap_or_default())
    }
}
