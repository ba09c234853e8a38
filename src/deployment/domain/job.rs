//! Fine-tuning job snapshot as reported by the backend.

use super::{AgentId, JobId, ParseJobStatusError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a fine-tuning job.
///
/// Transitions (`queued -> running -> completed | failed`) are driven by the
/// backend; this crate only reads the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for a training slot.
    Queued,
    /// Training in progress.
    Running,
    /// Training finished successfully.
    Completed,
    /// Training failed.
    Failed,
}

impl JobStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` when the backend will not change the status again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobStatus {
    type Error = ParseJobStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "queued" => Ok(Self::Queued),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseJobStatusError(value.to_owned())),
        }
    }
}

/// One fine-tuning run owned by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    agent_id: AgentId,
    status: JobStatus,
    created_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    training_file_path: Option<String>,
    error_message: Option<String>,
}

impl Job {
    /// Creates a job snapshot with no finish time or diagnostics.
    #[must_use]
    pub const fn new(
        id: JobId,
        agent_id: AgentId,
        status: JobStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            agent_id,
            status,
            created_at,
            finished_at: None,
            training_file_path: None,
            error_message: None,
        }
    }

    /// Sets the finish timestamp.
    #[must_use]
    pub const fn with_finished_at(mut self, finished_at: DateTime<Utc>) -> Self {
        self.finished_at = Some(finished_at);
        self
    }

    /// Sets the training data path.
    #[must_use]
    pub fn with_training_file_path(mut self, path: impl Into<String>) -> Self {
        self.training_file_path = Some(path.into());
        self
    }

    /// Sets the backend-reported failure message.
    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the owning agent identifier.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Returns the job status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns `true` when the job finished successfully and may be deployed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, JobStatus::Completed)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the finish timestamp, if the job has finished.
    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Returns the training data path, if reported.
    #[must_use]
    pub fn training_file_path(&self) -> Option<&str> {
        self.training_file_path.as_deref()
    }

    /// Returns the failure message, if reported.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
