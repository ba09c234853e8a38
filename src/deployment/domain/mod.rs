//! Domain model for deployment reconciliation.
//!
//! Jobs and deployments are snapshots of backend state. The domain only
//! validates and exposes them; lifecycle transitions belong to the backend.

mod deployment;
mod error;
mod ids;
mod job;
mod method;

pub use deployment::{Deployment, DeploymentStatus, Endpoint};
pub use error::{DeploymentDomainError, ParseDeploymentStatusError, ParseJobStatusError};
pub use ids::{AgentId, DeploymentId, JobId, RunId};
pub use job::{Job, JobStatus};
pub use method::Method;
