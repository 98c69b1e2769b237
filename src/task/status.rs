//! Task status as reported by the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Reflection;

/// Lifecycle status of a backend task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    /// No polling happens after a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by a successful submission. `task_id` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub task_id: String,
    pub initial_status: TaskStatus,
}

/// One status fetch.
///
/// The backend should only send `result` with `completed` and `error` with
/// `failed`, but nothing here enforces it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskSnapshot {
    pub status: TaskStatus,
    #[serde(default)]
    pub result: Option<Reflection>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TaskSnapshot {
    pub fn queued() -> Self {
        Self::pending(TaskStatus::Queued)
    }

    pub fn processing() -> Self {
        Self::pending(TaskStatus::Processing)
    }

    pub fn completed(result: Reflection) -> Self {
        Self {
            status: TaskStatus::Completed,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(error: Option<String>) -> Self {
        Self {
            status: TaskStatus::Failed,
            result: None,
            error,
        }
    }

    fn pending(status: TaskStatus) -> Self {
        Self {
            status,
            result: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!TaskStatus::Queued.is_terminal());
        assert!(!TaskStatus::Processing.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
    }

    #[test]
    fn test_snapshot_tolerates_missing_fields() {
        let snapshot: TaskSnapshot =
            serde_json::from_str(r#"{"status":"failed","error":"quota exceeded"}"#).unwrap();
        assert_eq!(snapshot, TaskSnapshot::failed(Some("quota exceeded".to_string())));

        let snapshot: TaskSnapshot = serde_json::from_str(r#"{"status":"completed"}"#).unwrap();
        assert_eq!(snapshot.status, TaskStatus::Completed);
        assert!(snapshot.result.is_none());
    }
}
