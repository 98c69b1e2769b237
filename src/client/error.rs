use thiserror::Error;

/// Failure of a single backend call.
///
/// Everything except `EmptyResponse` is a transport failure: the call did
/// not produce a usable answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Server returned a success response without a payload")]
    EmptyResponse,
}

impl ClientError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            Self::Network(format!("Connection failed: {}", e))
        } else {
            Self::Network(format!("Request failed: {}", e))
        }
    }
}
