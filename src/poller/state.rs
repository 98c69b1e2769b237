//! Poller phases and the projection of backend answers onto them.

use super::error::{CallStage, GenerationError};
use crate::client::ClientError;
use crate::task::{Reflection, TaskHandle, TaskSnapshot, TaskStatus};

/// Where the current generation cycle stands.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Submitting,
    /// `status` is the last status observed for `task_id`.
    Polling {
        task_id: String,
        status: TaskStatus,
    },
    Settled(Outcome),
}

/// Terminal result of a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Reflection),
    Failure(GenerationError),
}

/// Read model exposed to the front end.
///
/// `generation` counts `start` calls (plus one per failed submission) and
/// identifies which cycle the phase belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerView {
    pub phase: Phase,
    pub generation: u64,
}

impl Default for PollerView {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
        }
    }
}

impl PollerView {
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Submitting | Phase::Polling { .. })
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Settled(_))
    }

    pub fn task_id(&self) -> Option<&str> {
        match &self.phase {
            Phase::Polling { task_id, .. } => Some(task_id),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&Reflection> {
        match &self.phase {
            Phase::Settled(Outcome::Success(reflection)) => Some(reflection),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&GenerationError> {
        match &self.phase {
            Phase::Settled(Outcome::Failure(err)) => Some(err),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    /// Progress line while a cycle is running.
    pub fn progress_message(&self) -> Option<&'static str> {
        match &self.phase {
            Phase::Polling {
                status: TaskStatus::Queued,
                ..
            } => Some("Waiting in the queue..."),
            Phase::Submitting | Phase::Polling { .. } => Some("Writing your reflection..."),
            Phase::Idle | Phase::Settled(_) => None,
        }
    }
}

/// What the poll loop does after one status fetch.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    /// Still running; record the status and poll again.
    Continue(TaskStatus),
    Settle(Outcome),
}

/// Phase entered once the submission call resolves.
pub(crate) fn after_submit(submitted: Result<TaskHandle, ClientError>) -> Phase {
    match submitted {
        Ok(handle) => Phase::Polling {
            task_id: handle.task_id,
            status: handle.initial_status,
        },
        Err(err) => Phase::Settled(Outcome::Failure(GenerationError::from_client(
            CallStage::Submit,
            err,
        ))),
    }
}

pub(crate) fn after_poll(fetched: Result<TaskSnapshot, ClientError>) -> Step {
    let snapshot = match fetched {
        Ok(snapshot) => snapshot,
        Err(err) => {
            return Step::Settle(Outcome::Failure(GenerationError::from_client(
                CallStage::Poll,
                err,
            )))
        }
    };

    match snapshot.status {
        TaskStatus::Queued | TaskStatus::Processing => Step::Continue(snapshot.status),
        TaskStatus::Completed => match snapshot.result {
            Some(reflection) => Step::Settle(Outcome::Success(reflection)),
            None => Step::Settle(Outcome::Failure(GenerationError::IncompleteResult)),
        },
        TaskStatus::Failed => Step::Settle(Outcome::Failure(GenerationError::task_failed(
            snapshot.error,
        ))),
    }
}
