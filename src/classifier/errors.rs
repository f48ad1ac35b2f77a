use std::time::Duration;

use thiserror::Error;

/// Result type for classification client calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures talking to the external model
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error while calling model: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("model returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}
