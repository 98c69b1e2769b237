//! HTTP implementation of the task API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{ClientError, TaskApi};
use crate::config::Config;
use crate::task::{GenerationRequest, Reflection, TaskHandle, TaskSnapshot, TaskStatus};

/// Client for the `/v1/howa/tasks` endpoints.
#[derive(Clone)]
pub struct HttpTaskClient {
    base_url: String,
    client: Client,
}

impl HttpTaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/v1/howa/tasks", self.base_url)
    }

    fn task_url(&self, task_id: &str) -> String {
        format!("{}/{}", self.tasks_url(), urlencoding::encode(task_id))
    }

    /// Probe `GET /health`.
    pub async fn health(&self) -> Result<(), ClientError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TaskApi for HttpTaskClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<TaskHandle, ClientError> {
        let resp = self
            .client
            .post(self.tasks_url())
            .json(request)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = resp.status();
        let text = resp.text().await.map_err(ClientError::from_reqwest)?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: SubmitResponse = serde_json::from_str(&text).map_err(|e| {
            ClientError::Malformed(format!(
                "Failed to parse submission response: {}, body: {}",
                e, text
            ))
        })?;

        let task_id = parsed
            .task_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                ClientError::Malformed("Submission response has no task_id".to_string())
            })?;

        tracing::debug!(task_id = %task_id, "Submitted generation task");

        Ok(TaskHandle {
            task_id,
            initial_status: parsed.status.unwrap_or(TaskStatus::Queued),
        })
    }

    async fn fetch_status(&self, task_id: &str) -> Result<TaskSnapshot, ClientError> {
        let resp = self
            .client
            .get(self.task_url(task_id))
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = resp.status();
        let text = resp.text().await.map_err(ClientError::from_reqwest)?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Err(ClientError::EmptyResponse);
        }

        let parsed: Option<StatusResponse> = serde_json::from_str(&text).map_err(|e| {
            ClientError::Malformed(format!(
                "Failed to parse task status response: {}, body: {}",
                e, text
            ))
        })?;
        let parsed = parsed.ok_or(ClientError::EmptyResponse)?;

        tracing::trace!(
            task_id,
            status = %parsed.status,
            updated_at = ?parsed.updated_at,
            "Fetched task status"
        );

        Ok(TaskSnapshot {
            status: parsed.status,
            result: parsed.result,
            error: parsed.error,
        })
    }
}

/// Submission response format.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default)]
    status: Option<TaskStatus>,
}

/// Status response format.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: TaskStatus,
    #[serde(default)]
    result: Option<Reflection>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    updated_at: Option<i64>,
}
