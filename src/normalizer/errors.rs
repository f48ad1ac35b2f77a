use thiserror::Error;

/// Result type for normalizer operations
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Errors that can occur while normalizing model output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Model response is empty")]
    EmptyInput,

    #[error("No JSON object could be extracted: {reason}")]
    ParseFailure { reason: String, raw: String },

    #[error("Invalid value for field '{field}': {reason}")]
    SchemaViolation {
        field: &'static str,
        reason: String,
        raw: String,
    },
}

impl NormalizeError {
    /// Original model text, when the failure happened after input was accepted.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            NormalizeError::EmptyInput => None,
            NormalizeError::ParseFailure { raw, .. }
            | NormalizeError::SchemaViolation { raw, .. } => Some(raw),
        }
    }
}
