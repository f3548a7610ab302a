//! Error types for the streaming chat client.

use parley_core::error::ParleyError;

/// Errors from the streaming chat client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid UTF-8 in event stream: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<ClientError> for ParleyError {
    fn from(err: ClientError) -> Self {
        ParleyError::Stream(err.to_string())
    }
}
