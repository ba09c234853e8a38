//! REST implementation of [`BackendGateway`] using [`reqwest`].

use super::dto::{
    CreatedDeploymentResponse, DeploymentDto, DeploymentListResponse, JobListResponse,
    MethodListResponse, normalize_all,
};
use super::status::classify;
use crate::deployment::{
    domain::{AgentId, Deployment, Job, JobId, Method},
    ports::{BackendGateway, GatewayError, GatewayResult},
};
use async_trait::async_trait;
use reqwest::{Method as HttpMethod, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the agent backend API.
///
/// Every request carries the configured bearer token. Transport failures and
/// timeouts surface as [`GatewayError::Network`]; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpBackendGateway {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpBackendGateway {
    /// Creates a gateway with its own connection pool and request timeout.
    ///
    /// `base_url` is the API root, e.g. `http://localhost:8000`; a trailing
    /// slash is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Network`] when the HTTP client cannot be
    /// built.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::network)?;
        Ok(Self::with_client(client, base_url, token))
    }

    /// Creates a gateway reusing an existing [`reqwest::Client`].
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        Self {
            client,
            base_url: base.trim_end_matches('/').to_owned(),
            token: token.into(),
        }
    }

    /// Returns the API root this gateway targets.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: HttpMethod, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(method = method.as_str(), url = url.as_str(), "backend request");
        self.client.request(method, url).bearer_auth(&self.token)
    }

    /// Sends the request and returns the status with the raw body.
    async fn execute(request: RequestBuilder) -> GatewayResult<(StatusCode, String)> {
        let response = request.send().await.map_err(GatewayError::network)?;
        let status = response.status();
        let body = response.text().await.map_err(GatewayError::network)?;
        Ok((status, body))
    }

    /// Sends the request and decodes a successful JSON body.
    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> GatewayResult<T> {
        let (status, body) = Self::execute(request).await?;
        if !status.is_success() {
            return Err(classify(status, &body));
        }
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> GatewayResult<T> {
    serde_json::from_str(body).map_err(|err| GatewayError::InvalidPayload(err.to_string()))
}

#[async_trait]
impl BackendGateway for HttpBackendGateway {
    async fn list_jobs(&self, agent_id: AgentId) -> GatewayResult<Vec<Job>> {
        let response: JobListResponse = Self::fetch(
            self.request(HttpMethod::GET, &format!("/v1/agents/{agent_id}/jobs")),
        )
        .await?;
        normalize_all(response.jobs)
    }

    async fn list_deployments(&self, agent_id: AgentId) -> GatewayResult<Vec<Deployment>> {
        let response: DeploymentListResponse = Self::fetch(
            self.request(HttpMethod::GET, &format!("/v1/agents/{agent_id}/deployments")),
        )
        .await?;
        normalize_all(response.deployments)
    }

    async fn create_deployment(&self, job_id: JobId) -> GatewayResult<Deployment> {
        let response: CreatedDeploymentResponse = Self::fetch(
            self.request(HttpMethod::POST, &format!("/v1/jobs/{job_id}/deployment")),
        )
        .await?;
        Deployment::try_from(response.deployment)
    }

    async fn init_methods(&self, deployment: &Deployment) -> GatewayResult<Vec<Method>> {
        // The backend resolves the default set from the deployment's job.
        let path = format!("/v1/jobs/{}/methods", deployment.job_id());
        let response: MethodListResponse =
            Self::fetch(self.request(HttpMethod::POST, &path)).await?;
        normalize_all(response.methods)
    }

    async fn find_deployment(&self, job_id: JobId) -> GatewayResult<Option<Deployment>> {
        let request = self.request(HttpMethod::GET, &format!("/v1/jobs/{job_id}/deployment"));
        let (status, body) = Self::execute(request).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(classify(status, &body));
        }
        let dto: DeploymentDto = decode(&body)?;
        Deployment::try_from(dto).map(Some)
    }

    async fn list_methods(&self, job_id: JobId) -> GatewayResult<Vec<Method>> {
        let response: MethodListResponse = Self::fetch(
            self.request(HttpMethod::GET, &format!("/v1/jobs/{job_id}/methods")),
        )
        .await?;
        normalize_all(response.methods)
    }
}
