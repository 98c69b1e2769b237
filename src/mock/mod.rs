//! In-memory mock of the generation backend.
//!
//! Serves the same task endpoints as the real backend so the client can be
//! developed and tested without it. Tasks progress by elapsed time:
//! `queued` until the processing delay, `processing` until the completion
//! delay, then `completed` with a canned reflection. A theme of `fail`
//! ends in `failed` instead. Tasks older than the configured TTL are
//! forgotten and answer 404.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::MockBackendConfig;
use crate::task::{Audience, Quotation, Reflection, TaskStatus};

/// Theme that makes the mock report a failed task.
pub const FAILING_THEME: &str = "fail";
pub const FAILURE_MESSAGE: &str = "Generation failed: the mock backend was asked to fail";

/// Shared mock backend state.
pub struct MockState {
    pub config: MockBackendConfig,
    tasks: RwLock<HashMap<String, MockTask>>,
}

struct MockTask {
    theme: String,
    audiences: Vec<Audience>,
    started: Instant,
    created_at: i64,
}

impl MockState {
    pub fn new(config: MockBackendConfig) -> Self {
        Self {
            config,
            tasks: RwLock::new(HashMap::new()),
        }
    }
}

impl MockTask {
    fn is_expired(&self, config: &MockBackendConfig) -> bool {
        self.started.elapsed() >= config.task_ttl
    }

    fn status(&self, config: &MockBackendConfig) -> TaskStatus {
        let elapsed = self.started.elapsed();
        if elapsed < config.processing_delay {
            TaskStatus::Queued
        } else if elapsed < config.completion_delay {
            TaskStatus::Processing
        } else if self.theme == FAILING_THEME {
            TaskStatus::Failed
        } else {
            TaskStatus::Completed
        }
    }
}

/// Build the mock router.
pub fn router(config: MockBackendConfig) -> Router {
    let state = Arc::new(MockState::new(config));

    Router::new()
        .route("/health", get(health))
        .route("/v1/howa/tasks", post(create_task))
        .route("/v1/howa/tasks/:task_id", get(get_task))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve the mock backend until the process exits.
pub async fn serve(config: MockBackendConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Mock backend listening on {}", listener.local_addr()?);
    axum::serve(listener, router(config)).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub theme: String,
    pub audiences: Vec<Audience>,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    pub task_id: String,
    pub status: TaskStatus,
}

#[derive(Debug, Serialize)]
pub struct TaskStatusResponse {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Reflection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /v1/howa/tasks - Enqueue a generation task.
async fn create_task(
    State(state): State<Arc<MockState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<CreateTaskResponse>, (StatusCode, Json<serde_json::Value>)> {
    let theme = req.theme.trim().to_string();
    if theme.is_empty() || req.audiences.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "theme and audiences must not be empty" })),
        ));
    }

    let task_id = Uuid::new_v4().to_string();
    let task = MockTask {
        theme,
        audiences: req.audiences,
        started: Instant::now(),
        created_at: chrono::Utc::now().timestamp(),
    };
    tracing::info!(task_id = %task_id, theme = %task.theme, "Enqueued mock task");

    let mut tasks = state.tasks.write().await;
    let before = tasks.len();
    tasks.retain(|_, existing| !existing.is_expired(&state.config));
    if tasks.len() < before {
        tracing::debug!(expired = before - tasks.len(), "Dropped expired mock tasks");
    }
    tasks.insert(task_id.clone(), task);
    drop(tasks);

    Ok(Json(CreateTaskResponse {
        task_id,
        status: TaskStatus::Queued,
    }))
}

/// GET /v1/howa/tasks/:task_id - Report task progress.
async fn get_task(
    State(state): State<Arc<MockState>>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskStatusResponse>, (StatusCode, String)> {
    let tasks = state.tasks.read().await;
    let task = tasks
        .get(&task_id)
        .filter(|task| !task.is_expired(&state.config))
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Task {} not found", task_id)))?;

    let status = task.status(&state.config);
    let (result, error) = match status {
        TaskStatus::Completed => (Some(compose(&task.theme, &task.audiences)), None),
        TaskStatus::Failed => (None, Some(FAILURE_MESSAGE.to_string())),
        TaskStatus::Queued | TaskStatus::Processing => (None, None),
    };

    Ok(Json(TaskStatusResponse {
        task_id,
        status,
        result,
        error,
        created_at: task.created_at,
        updated_at: chrono::Utc::now().timestamp(),
    }))
}

/// Canned reflection echoing the request.
fn compose(theme: &str, audiences: &[Audience]) -> Reflection {
    let listeners = audiences
        .iter()
        .map(Audience::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    Reflection {
        title: format!("[Mock] Finding {} in a restless age", theme),
        introduction: format!(
            "Every time a notification chimes, the heart stirs a little. \
             This introduction was written for: {}.",
            listeners
        ),
        problem_statement: "Always connected and always comparing, we wear ourselves down \
                            without noticing. Where does this thirst come from?"
            .to_string(),
        sutra_quote: Quotation {
            text: "I only know contentment.".to_string(),
            source: "Tsukubai of Ryoan-ji".to_string(),
        },
        modern_example: format!(
            "No need to be downcast by someone else's highlight reel. Turn toward {} in what \
             you already hold: a warm cup of coffee, a favourite song, a quiet hour.",
            theme
        ),
        conclusion: "Instead of seeking what is missing outside, give thanks for what is \
                     already enough within."
            .to_string(),
    }
}
