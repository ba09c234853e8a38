//! Natural-language capability labels exposed by a deployment.

use super::DeploymentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability label such as `Optimize the route`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Method(String);

impl Method {
    /// Creates a validated method label.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentDomainError::EmptyMethodName`] when the name is
    /// empty after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, DeploymentDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DeploymentDomainError::EmptyMethodName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Method {
    type Error = DeploymentDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.0
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
