use std::fmt;

use thiserror::Error;

use crate::client::ClientError;
use crate::task::RequestError;

pub const TASK_FAILED_MESSAGE: &str =
    "Failed to generate the reflection. Please try again later.";
pub const INCOMPLETE_RESULT_MESSAGE: &str = "The task completed but no result was returned.";

/// Which backend call went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStage {
    Submit,
    Poll,
}

impl CallStage {
    fn failure_message(&self) -> &'static str {
        match self {
            Self::Submit => {
                "Failed to submit the generation request. Make sure the API server is running."
            }
            Self::Poll => "Failed to fetch the task status. Please try again later.",
        }
    }
}

impl fmt::Display for CallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submit => f.write_str("submit"),
            Self::Poll => f.write_str("poll"),
        }
    }
}

/// Why a generation cycle ended without a reflection.
///
/// `Display` is the message shown to the user. Invalid requests never reach
/// this point; `start` rejects them with `StartError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("{} ({source})", .stage.failure_message())]
    Transport {
        stage: CallStage,
        #[source]
        source: ClientError,
    },

    #[error("The server returned an empty response during {stage}.")]
    EmptyResponse { stage: CallStage },

    #[error("{}", .0.as_deref().unwrap_or(TASK_FAILED_MESSAGE))]
    TaskFailed(Option<String>),

    #[error("{}", INCOMPLETE_RESULT_MESSAGE)]
    IncompleteResult,
}

impl GenerationError {
    pub fn from_client(stage: CallStage, err: ClientError) -> Self {
        match err {
            ClientError::EmptyResponse => Self::EmptyResponse { stage },
            source => Self::Transport { stage, source },
        }
    }

    /// A blank backend message counts as no message.
    pub fn task_failed(message: Option<String>) -> Self {
        Self::TaskFailed(message.filter(|m| !m.trim().is_empty()))
    }
}

/// Synchronous rejection of `TaskPoller::start`. No network call was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("Task poller has been torn down")]
    Closed,
}
