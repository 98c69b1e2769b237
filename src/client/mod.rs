//! Task client module for talking to the generation backend.
//!
//! The poller only sees the `TaskApi` trait, with `HttpTaskClient` as the
//! production implementation. Calls are one-shot: no retries, no state kept
//! between calls.

mod error;
mod http;

pub use error::ClientError;
pub use http::HttpTaskClient;

use std::sync::Arc;

use async_trait::async_trait;

use crate::task::{GenerationRequest, TaskHandle, TaskSnapshot};

/// Submission and status calls against the backend.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Submit a generation request.
    ///
    /// Never returns a handle with an empty task id.
    async fn submit(&self, request: &GenerationRequest) -> Result<TaskHandle, ClientError>;

    /// Fetch the current status of a task.
    async fn fetch_status(&self, task_id: &str) -> Result<TaskSnapshot, ClientError>;
}

/// Shared reference to a task API implementation.
pub type TaskApiRef = Arc<dyn TaskApi>;
