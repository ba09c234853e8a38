//! Deployment aggregate and status.

use super::{DeploymentDomainError, DeploymentId, JobId, ParseDeploymentStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serving status of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    /// The endpoint is serving requests.
    Active,
    /// The endpoint exists but is not serving.
    Inactive,
}

impl DeploymentStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DeploymentStatus {
    type Error = ParseDeploymentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseDeploymentStatusError(value.to_owned())),
        }
    }
}

/// Validated prediction endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    /// Creates a validated endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentDomainError::InvalidEndpoint`] when the trimmed
    /// value does not start with `http://` or `https://`.
    pub fn new(value: impl Into<String>) -> Result<Self, DeploymentDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(DeploymentDomainError::InvalidEndpoint(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the endpoint as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Endpoint {
    type Error = DeploymentDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A servable endpoint bound to exactly one completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    id: DeploymentId,
    job_id: JobId,
    status: DeploymentStatus,
    endpoint: Option<Endpoint>,
}

impl Deployment {
    /// Creates a deployment without an assigned endpoint.
    #[must_use]
    pub const fn new(id: DeploymentId, job_id: JobId, status: DeploymentStatus) -> Self {
        Self {
            id,
            job_id,
            status,
            endpoint: None,
        }
    }

    /// Sets the endpoint assigned by the backend.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Returns the deployment identifier.
    #[must_use]
    pub const fn id(&self) -> DeploymentId {
        self.id
    }

    /// Returns the identifier of the job this deployment serves.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Returns the serving status.
    #[must_use]
    pub const fn status(&self) -> DeploymentStatus {
        self.status
    }

    /// Returns the endpoint, once the backend has assigned one.
    #[must_use]
    pub const fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }
}
