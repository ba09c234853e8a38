//! Error types for deployment domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing deployment domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeploymentDomainError {
    /// An identifier was zero.
    #[error("invalid {kind} identifier {value}, expected a positive integer")]
    InvalidIdentifier {
        /// Identifier kind (`agent`, `job`, `deployment`).
        kind: &'static str,
        /// Rejected raw value.
        value: u64,
    },

    /// The method name is empty after trimming.
    #[error("method name must not be empty")]
    EmptyMethodName,

    /// The endpoint is not an `http://` or `https://` URL.
    #[error("deployment endpoint '{0}' must start with 'http://' or 'https://'")]
    InvalidEndpoint(String),
}

/// Error returned while parsing a job status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job status: {0}")]
pub struct ParseJobStatusError(pub String);

/// Error returned while parsing a deployment status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown deployment status: {0}")]
pub struct ParseDeploymentStatusError(pub String);
