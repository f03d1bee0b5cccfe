//! Shared test helpers: an in-process mock of the lesson-plan backend, a
//! scripted in-memory client, and JSON fixtures.
//!
//! The mock speaks the same HTTP contract as the real service
//! (`POST /create-lesson-plan`, `GET /health`), answers with scripted
//! replies, and records every request body it receives.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use lessonbot_core::{
    ClientError, HealthStatus, LessonPlan, LessonPlanApi, LessonPlanRequest, LessonPlanResponse,
};

// ---------------------------------------------------------------------------
// Scripted replies
// ---------------------------------------------------------------------------

/// What the mock answers on one endpoint.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
}

impl MockReply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

/// A request body received by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub content_type: Option<String>,
    /// Parsed JSON, or a JSON string holding the raw body if it did not parse.
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    create: MockReply,
    health: MockReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

// ---------------------------------------------------------------------------
// Mock backend
// ---------------------------------------------------------------------------

/// A running mock backend bound to an ephemeral localhost port.
///
/// The server task is aborted when the value is dropped.
pub struct MockBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend with the given create reply and a healthy `/health`.
    pub async fn start(create: MockReply) -> Self {
        Self::start_with(create, MockReply::json(200, healthy_body())).await
    }

    pub async fn start_with(create: MockReply, health: MockReply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            create,
            health,
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route("/create-lesson-plan", post(create_handler))
            .route("/health", get(health_handler))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock backend");
        let addr: SocketAddr = listener.local_addr().expect("mock backend has no address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}/"),
            requests,
            handle,
        }
    }

    /// Every request received on `/create-lesson-plan`, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("request log poisoned").len()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_handler(State(state): State<MockState>, headers: HeaderMap, body: String) -> Response {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
    state
        .requests
        .lock()
        .expect("request log poisoned")
        .push(RecordedRequest { content_type, body });
    state.create.into_response()
}

async fn health_handler(State(state): State<MockState>) -> Response {
    state.health.into_response()
}

/// A base URL on which nothing is listening.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind probe port");
    let addr = listener.local_addr().expect("probe port has no address");
    drop(listener);
    format!("http://{addr}/")
}

// ---------------------------------------------------------------------------
// Scripted client
// ---------------------------------------------------------------------------

/// In-memory [`LessonPlanApi`] that answers every call with a fixed outcome
/// and remembers what it was asked.
pub struct ScriptedApi {
    outcome: Result<LessonPlanResponse, ClientError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<LessonPlanRequest>>,
}

impl ScriptedApi {
    pub fn new(outcome: Result<LessonPlanResponse, ClientError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    /// Answer with a successful envelope carrying `plan`.
    pub fn succeeding(plan: LessonPlan) -> Arc<Self> {
        Self::new(Ok(LessonPlanResponse {
            success: true,
            lesson_plan: Some(plan),
            error: None,
            message: "Lesson plan created successfully".to_string(),
        }))
    }

    pub fn failing(error: ClientError) -> Arc<Self> {
        Self::new(Err(error))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<LessonPlanRequest> {
        self.last_request.lock().expect("request log poisoned").clone()
    }
}

#[async_trait]
impl LessonPlanApi for ScriptedApi {
    async fn create_lesson_plan(
        &self,
        request: &LessonPlanRequest,
    ) -> Result<LessonPlanResponse, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().expect("request log poisoned") = Some(request.clone());
        self.outcome.clone()
    }

    async fn check_health(&self) -> Result<HealthStatus, ClientError> {
        Err(ClientError::BackendUnavailable)
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// [`plan_json`] decoded into the model type.
pub fn sample_plan(topic: &str, grade: &str, duration_minutes: u32, urls: &[&str]) -> LessonPlan {
    serde_json::from_value(plan_json(topic, grade, duration_minutes, urls))
        .expect("fixture plan should decode")
}

/// A complete lesson plan as the backend would send it.
pub fn plan_json(topic: &str, grade: &str, duration_minutes: u32, urls: &[&str]) -> Value {
    json!({
        "topic": topic,
        "grade_level": grade,
        "duration_minutes": duration_minutes,
        "learning_objectives": [
            format!("Describe the key ideas of {topic}"),
            format!("Apply {topic} to an everyday example"),
        ],
        "materials_needed": ["Whiteboard", "Printed worksheet", "Coloured pencils"],
        "lesson_overview": [
            { "title": "Introduction", "duration_minutes": 15, "description": "Activate prior knowledge." },
            { "title": "Guided exploration", "duration_minutes": duration_minutes.saturating_sub(30), "description": "Small-group investigation." },
            { "title": "Wrap-up", "duration_minutes": 15, "description": "Share findings and reflect." }
        ],
        "exercises": ["Label the diagram", "Pair discussion"],
        "assessment": [format!("What is {topic}?"), "Explain one real-world application."],
        "urls": urls,
    })
}

pub fn success_body(plan: Value) -> Value {
    json!({
        "success": true,
        "lesson_plan": plan,
        "message": "Lesson plan created successfully",
    })
}

pub fn failure_body(error: &str, message: &str) -> Value {
    json!({
        "success": false,
        "error": error,
        "message": message,
    })
}

pub fn healthy_body() -> Value {
    json!({ "status": "healthy", "message": "Lesson Planner Bot API is running" })
}
