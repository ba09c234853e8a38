//! Wire DTOs for the backend REST API and their normalisation into domain
//! types.
//!
//! The backend and older clients disagree on field spelling
//! (`job_id` / `finetuning_job_id` / `jobId`), so every DTO accepts each
//! variant through serde aliases and converts through one validating
//! `TryFrom`.

use crate::deployment::domain::{
    AgentId, Deployment, DeploymentId, DeploymentStatus, Endpoint, Job, JobId, JobStatus, Method,
};
use crate::deployment::ports::GatewayError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Error body returned by the backend on failure.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub(super) error: Option<String>,
}

/// `GET /v1/agents/{id}/jobs` response.
#[derive(Debug, Deserialize)]
pub(super) struct JobListResponse {
    #[serde(default)]
    pub(super) jobs: Vec<JobDto>,
}

/// `GET /v1/agents/{id}/deployments` response.
#[derive(Debug, Deserialize)]
pub(super) struct DeploymentListResponse {
    #[serde(default)]
    pub(super) deployments: Vec<DeploymentDto>,
}

/// `POST /v1/jobs/{id}/deployment` response.
#[derive(Debug, Deserialize)]
pub(super) struct CreatedDeploymentResponse {
    pub(super) deployment: DeploymentDto,
}

/// `GET` and `POST /v1/jobs/{id}/methods` response.
#[derive(Debug, Deserialize)]
pub(super) struct MethodListResponse {
    #[serde(default)]
    pub(super) methods: Vec<MethodDto>,
}

/// Job list item.
#[derive(Debug, Deserialize)]
pub(super) struct JobDto {
    id: u64,
    #[serde(alias = "agentId")]
    agent_id: u64,
    status: String,
    #[serde(alias = "createdAt")]
    created_at: String,
    #[serde(default, alias = "finishedAt")]
    finished_at: Option<String>,
    #[serde(default, alias = "trainingFilePath")]
    training_file_path: Option<String>,
    #[serde(default, alias = "errorMessage")]
    error_message: Option<String>,
}

/// Deployment list item, created deployment, or single-job deployment.
#[derive(Debug, Deserialize)]
pub(super) struct DeploymentDto {
    id: u64,
    #[serde(alias = "finetuning_job_id", alias = "jobId")]
    job_id: u64,
    status: String,
    #[serde(default)]
    endpoint: Option<String>,
}

/// Method entry, either `{"name": "..."}` or a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum MethodDto {
    Named { name: String },
    Bare(String),
}

fn invalid(context: &str, err: impl std::fmt::Display) -> GatewayError {
    GatewayError::InvalidPayload(format!("{context}: {err}"))
}

/// Parses RFC 3339 timestamps, falling back to naive ISO 8601 read as UTC.
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, GatewayError> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
        })
        .map_err(|err| invalid(&format!("timestamp '{value}'"), err))
}

/// Reads a job status, counting statuses this client does not know (such as
/// the backend's transient `creating`) as failed.
fn job_status_or_failed(job_id: JobId, raw: &str) -> JobStatus {
    JobStatus::try_from(raw).unwrap_or_else(|err| {
        tracing::warn!(%job_id, error = %err, "unrecognised job status, treating as failed");
        JobStatus::Failed
    })
}

/// Reads a deployment status, counting statuses this client does not know
/// (such as `pending`) as inactive.
fn deployment_status_or_inactive(deployment_id: DeploymentId, raw: &str) -> DeploymentStatus {
    DeploymentStatus::try_from(raw).unwrap_or_else(|err| {
        tracing::warn!(
            %deployment_id,
            error = %err,
            "unrecognised deployment status, treating as inactive"
        );
        DeploymentStatus::Inactive
    })
}

impl TryFrom<JobDto> for Job {
    type Error = GatewayError;

    fn try_from(dto: JobDto) -> Result<Self, Self::Error> {
        let id = JobId::new(dto.id).map_err(|err| invalid("job", err))?;
        let agent_id = AgentId::new(dto.agent_id).map_err(|err| invalid("job", err))?;
        let status = job_status_or_failed(id, &dto.status);
        let created_at = parse_timestamp(&dto.created_at)?;

        let mut job = Self::new(id, agent_id, status, created_at);
        if let Some(finished_at) = dto.finished_at.as_deref() {
            job = job.with_finished_at(parse_timestamp(finished_at)?);
        }
        if let Some(path) = dto.training_file_path {
            job = job.with_training_file_path(path);
        }
        if let Some(message) = dto.error_message.filter(|message| !message.trim().is_empty()) {
            job = job.with_error_message(message);
        }
        Ok(job)
    }
}

impl TryFrom<DeploymentDto> for Deployment {
    type Error = GatewayError;

    fn try_from(dto: DeploymentDto) -> Result<Self, Self::Error> {
        let id = DeploymentId::new(dto.id).map_err(|err| invalid("deployment", err))?;
        let job_id = JobId::new(dto.job_id).map_err(|err| invalid("deployment", err))?;
        let status = deployment_status_or_inactive(id, &dto.status);

        let endpoint = dto
            .endpoint
            .filter(|endpoint| !endpoint.trim().is_empty())
            .map(Endpoint::new)
            .transpose()
            .map_err(|err| invalid("deployment", err))?;

        let mut deployment = Self::new(id, job_id, status);
        if let Some(found) = endpoint {
            deployment = deployment.with_endpoint(found);
        }
        Ok(deployment)
    }
}

impl TryFrom<MethodDto> for Method {
    type Error = GatewayError;

    fn try_from(dto: MethodDto) -> Result<Self, Self::Error> {
        let name = match dto {
            MethodDto::Named { name } | MethodDto::Bare(name) => name,
        };
        Self::new(name).map_err(|err| invalid("method", err))
    }
}

/// Converts every item, failing on the first invalid one.
pub(super) fn normalize_all<D, T>(items: Vec<D>) -> Result<Vec<T>, GatewayError>
where
    T: TryFrom<D, Error = GatewayError>,
{
    items.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn job_list_accepts_snake_case_payload() {
        let body = json!({
            "jobs": [{
                "id": 45,
                "agent_id": 3,
                "status": "completed",
                "training_file_path": "uploads/3/train.jsonl",
                "created_at": "2025-01-05T00:03:07Z",
                "finished_at": "2025-01-05T01:00:00",
                "error_message": null
            }]
        });
        let response: JobListResponse = serde_json::from_value(body).expect("valid payload");
        let jobs: Vec<Job> = normalize_all(response.jobs).expect("normalisation succeeds");

        let job = jobs.first().expect("one job");
        assert_eq!(job.id().value(), 45);
        assert_eq!(job.agent_id().value(), 3);
        assert_eq!(job.status(), JobStatus::Completed);
        assert!(job.finished_at().is_some());
        assert_eq!(job.training_file_path(), Some("uploads/3/train.jsonl"));
        assert_eq!(job.error_message(), None);
    }

    #[rstest]
    fn job_accepts_camel_case_aliases() {
        let body = json!({
            "id": 7,
            "agentId": 2,
            "status": " Running ",
            "createdAt": "2025-02-01T10:00:00+09:00"
        });
        let dto: JobDto = serde_json::from_value(body).expect("valid payload");
        let job = Job::try_from(dto).expect("normalisation succeeds");

        assert_eq!(job.status(), JobStatus::Running);
        assert_eq!(job.created_at().to_rfc3339(), "2025-02-01T01:00:00+00:00");
    }

    #[rstest]
    #[case(json!({"id": 1, "job_id": 45, "status": "inactive", "endpoint": null}))]
    #[case(json!({"id": 1, "finetuning_job_id": 45, "status": "inactive"}))]
    #[case(json!({"id": 1, "jobId": 45, "status": "INACTIVE", "endpoint": ""}))]
    fn deployment_accepts_every_job_id_spelling(#[case] body: serde_json::Value) {
        let dto: DeploymentDto = serde_json::from_value(body).expect("valid payload");
        let deployment = Deployment::try_from(dto).expect("normalisation succeeds");

        assert_eq!(deployment.job_id().value(), 45);
        assert_eq!(deployment.status(), DeploymentStatus::Inactive);
        assert!(deployment.endpoint().is_none());
    }

    #[rstest]
    fn deployment_keeps_assigned_endpoint() {
        let body = json!({
            "id": 9,
            "job_id": 45,
            "status": "active",
            "endpoint": "http://engine:8080/job45/predict"
        });
        let dto: DeploymentDto = serde_json::from_value(body).expect("valid payload");
        let deployment = Deployment::try_from(dto).expect("normalisation succeeds");

        assert_eq!(
            deployment.endpoint().map(Endpoint::as_str),
            Some("http://engine:8080/job45/predict")
        );
    }

    #[rstest]
    #[case(json!({"id": 0, "job_id": 45, "status": "active"}))]
    #[case(json!({"id": 9, "job_id": 45, "status": "active", "endpoint": "ftp://x"}))]
    fn deployment_rejects_invalid_values(#[case] body: serde_json::Value) {
        let dto: DeploymentDto = serde_json::from_value(body).expect("valid payload");
        let result = Deployment::try_from(dto);

        assert!(matches!(result, Err(GatewayError::InvalidPayload(_))));
    }

    #[rstest]
    #[case("creating")]
    #[case("uploading")]
    fn unknown_job_status_counts_as_failed(#[case] status: &str) {
        let body = json!({
            "jobs": [
                {"id": 1, "agent_id": 1, "status": "completed", "created_at": "2025-01-05T00:03:07Z"},
                {"id": 2, "agent_id": 1, "status": status, "created_at": "2025-01-05T00:04:00Z"}
            ]
        });
        let response: JobListResponse = serde_json::from_value(body).expect("valid payload");
        let jobs: Vec<Job> = normalize_all(response.jobs).expect("normalisation succeeds");

        let statuses: Vec<JobStatus> = jobs.iter().map(Job::status).collect();
        assert_eq!(statuses, vec![JobStatus::Completed, JobStatus::Failed]);
    }

    #[rstest]
    fn unknown_deployment_status_counts_as_inactive() {
        let body = json!({
            "deployments": [
                {"id": 5, "job_id": 1, "status": "active"},
                {"id": 6, "job_id": 2, "status": "pending"}
            ]
        });
        let response: DeploymentListResponse =
            serde_json::from_value(body).expect("valid payload");
        let deployments: Vec<Deployment> =
            normalize_all(response.deployments).expect("normalisation succeeds");

        let statuses: Vec<DeploymentStatus> =
            deployments.iter().map(Deployment::status).collect();
        assert_eq!(
            statuses,
            vec![DeploymentStatus::Active, DeploymentStatus::Inactive]
        );
    }

    #[rstest]
    fn methods_accept_objects_and_bare_strings() {
        let body = json!({
            "deployment_id": 9,
            "methods": [{"name": "Optimize the route"}, "Provide safety and emergency support"]
        });
        let response: MethodListResponse = serde_json::from_value(body).expect("valid payload");
        let methods: Vec<Method> = normalize_all(response.methods).expect("normalisation succeeds");

        let names: Vec<&str> = methods.iter().map(Method::name).collect();
        assert_eq!(
            names,
            vec!["Optimize the route", "Provide safety and emergency support"]
        );
    }

    #[rstest]
    fn blank_method_name_is_rejected() {
        let result = Method::try_from(MethodDto::Bare("   ".to_owned()));
        assert!(matches!(result, Err(GatewayError::InvalidPayload(_))));
    }
}
