//! The backend HTTP contract.
//!
//! Every request is single-shot and unauthenticated. Each one carries an
//! explicit timeout; a caller cancels an in-flight request by aborting the
//! task that owns the future. Response bodies are decoded as JSON and
//! nothing more — the query-processing contract is the backend's concern.

use std::time::Duration;

use tracing::debug;

use taxchat_core::models::query::{QueryRequest, QueryResponse};
use taxchat_core::models::status::SystemStatus;
use taxchat_core::models::taxpayer::Taxpayer;

use crate::error::ApiError;

const TAXPAYERS_PATH: &str = "/api/v1/taxpayers";
const PROCESS_QUERY_PATH: &str = "/api/v1/chat/process-query";
const STATUS_PATH: &str = "/api/v1/status";
const HEALTH_PATH: &str = "/api/v1/health";

/// Default per-request timeout. The original client had none, which left the
/// UI stuck in a loading state against a hung backend.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the taxpayer list.
    pub async fn get_taxpayers(&self) -> Result<Vec<Taxpayer>, ApiError> {
        let url = self.url(TAXPAYERS_PATH);
        debug!(%url, "fetching taxpayers");

        let response = check_success(self.http.get(&url).send().await?)?;
        Ok(response.json().await?)
    }

    /// Submit a natural-language query scoped to one taxpayer.
    pub async fn process_query(
        &self,
        request: &QueryRequest,
    ) -> Result<QueryResponse, ApiError> {
        let url = self.url(PROCESS_QUERY_PATH);
        debug!(%url, taxpayer_id = %request.taxpayer_id, "submitting query");

        let response = check_success(self.http.post(&url).json(request).send().await?)?;
        Ok(response.json().await?)
    }

    /// Fetch system status.
    ///
    /// Both 200 (healthy) and 503 (degraded/critical) carry a decodable
    /// [`SystemStatus`] body; any other status is an HTTP error.
    pub async fn get_status(&self) -> Result<SystemStatus, ApiError> {
        let url = self.url(STATUS_PATH);
        debug!(%url, "fetching system status");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            Ok(response.json().await?)
        } else {
            Err(ApiError::Http {
                status: status.as_u16(),
            })
        }
    }

    /// Fetch the health endpoint as raw JSON. The payload shape is
    /// implementation-defined, so it is passed through untyped.
    pub async fn get_health(&self) -> Result<serde_json::Value, ApiError> {
        let url = self.url(HEALTH_PATH);
        debug!(%url, "fetching health");

        let response = check_success(self.http.get(&url).send().await?)?;
        Ok(response.json().await?)
    }
}

fn check_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Http {
            status: status.as_u16(),
        })
    }
}
