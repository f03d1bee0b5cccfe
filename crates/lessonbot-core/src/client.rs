//! Transport client for the lesson-plan generation service.
//!
//! The [`LessonPlanApi`] trait is the seam between the orchestrator and the
//! network. [`HttpLessonPlanClient`] is the reqwest implementation; tests
//! substitute scripted implementations or point it at a mock backend.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{HealthStatus, LessonPlanRequest, LessonPlanResponse};

/// Default backend the client talks to when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "https://lesson-planner-backend.onrender.com/";

/// Message used when a failed request carries no server explanation.
pub const DEFAULT_REQUEST_FAILED_MESSAGE: &str = "Failed to create lesson plan";

const CREATE_PATH: &str = "create-lesson-plan";
const HEALTH_PATH: &str = "health";

/// Errors surfaced by the transport client.
///
/// The `Display` text of each variant is the user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Network failure, non-2xx status or an undecodable body.
    #[error("{0}")]
    RequestFailed(String),
    /// The health probe did not get a usable answer.
    #[error("Backend server is not responding")]
    BackendUnavailable,
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

/// Operations offered by the generation service.
///
/// Each call performs exactly one request: no retries, no caching.
#[async_trait]
pub trait LessonPlanApi: Send + Sync {
    /// Submit a request and return the decoded envelope verbatim.
    ///
    /// Consistency between `success` and `lesson_plan` is not checked here.
    async fn create_lesson_plan(
        &self,
        request: &LessonPlanRequest,
    ) -> Result<LessonPlanResponse, ClientError>;

    /// Probe the backend's health endpoint.
    async fn check_health(&self) -> Result<HealthStatus, ClientError>;
}

#[async_trait]
impl LessonPlanApi for Arc<dyn LessonPlanApi> {
    async fn create_lesson_plan(
        &self,
        request: &LessonPlanRequest,
    ) -> Result<LessonPlanResponse, ClientError> {
        (**self).create_lesson_plan(request).await
    }

    async fn check_health(&self) -> Result<HealthStatus, ClientError> {
        (**self).check_health().await
    }
}

// Compile-time assertion: LessonPlanApi must be usable as `dyn LessonPlanApi`.
const _: () = {
    fn _assert_object_safe(_: &dyn LessonPlanApi) {}
};

/// Connection settings for [`HttpLessonPlanClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Join `path` onto the base URL with exactly one `/` between them.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// reqwest-backed implementation of [`LessonPlanApi`].
pub struct HttpLessonPlanClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpLessonPlanClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lessonbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl LessonPlanApi for HttpLessonPlanClient {
    async fn create_lesson_plan(
        &self,
        request: &LessonPlanRequest,
    ) -> Result<LessonPlanResponse, ClientError> {
        let url = self.config.endpoint(CREATE_PATH);
        debug!(%url, topic = %request.topic, grade = ?request.grade_level, "creating lesson plan");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(%url, error = %e, "lesson plan request failed to send");
                request_failed(None)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(%url, %status, error = %e, "failed to read lesson plan response body");
            request_failed(None)
        })?;

        if !status.is_success() {
            warn!(%url, %status, "lesson plan request rejected by backend");
            return Err(request_failed(server_message(&body)));
        }

        serde_json::from_str::<LessonPlanResponse>(&body).map_err(|e| {
            // A 2xx body carries no error payload; its `message` is not an explanation.
            warn!(%url, error = %e, "lesson plan response did not match the expected shape");
            request_failed(None)
        })
    }

    async fn check_health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.config.endpoint(HEALTH_PATH);
        debug!(%url, "checking backend health");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "health check failed to send");
            ClientError::BackendUnavailable
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "health check returned non-success status");
            return Err(ClientError::BackendUnavailable);
        }

        response.json::<HealthStatus>().await.map_err(|e| {
            warn!(%url, error = %e, "health check body did not decode");
            ClientError::BackendUnavailable
        })
    }
}

fn request_failed(message: Option<String>) -> ClientError {
    ClientError::RequestFailed(
        message.unwrap_or_else(|| DEFAULT_REQUEST_FAILED_MESSAGE.to_string()),
    )
}

/// Extract a human-readable message from an error payload.
///
/// Looks at `message` first, then FastAPI's `detail` when it is a string.
/// Blank strings count as absent.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "detail"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
