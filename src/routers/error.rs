use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{classifier::ClientError, multimodal::MediaError, normalizer::NormalizeError};

/// Every way a call to the analyze endpoint can fail.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Uploaded file must be an image, got content type '{0}'")]
    InvalidContentType(String),

    #[error("No file was uploaded")]
    MissingFile,

    #[error("Malformed upload: {message}")]
    MalformedUpload { status: StatusCode, message: String },

    #[error("Could not decode uploaded image: {0}")]
    ImageDecodeFailure(MediaError),

    #[error("Model returned an empty response")]
    EmptyModelResponse,

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("Model call failed: {0}")]
    UpstreamCallFailure(#[from] ClientError),

    #[error("Unexpected failure: {0}")]
    UnknownFailure(String),
}

impl From<MediaError> for AnalyzeError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Blocking(e) => AnalyzeError::UnknownFailure(e.to_string()),
            other => AnalyzeError::ImageDecodeFailure(other),
        }
    }
}

impl AnalyzeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalyzeError::InvalidContentType(_)
            | AnalyzeError::MissingFile
            | AnalyzeError::ImageDecodeFailure(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::MalformedUpload { status, .. } => *status,
            AnalyzeError::Normalize(NormalizeError::EmptyInput) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AnalyzeError::Normalize(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AnalyzeError::EmptyModelResponse
            | AnalyzeError::UpstreamCallFailure(_)
            | AnalyzeError::UnknownFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, "Analyze request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "Analyze request rejected");
        }

        match self {
            AnalyzeError::Normalize(ref err @ NormalizeError::ParseFailure { .. })
            | AnalyzeError::Normalize(ref err @ NormalizeError::SchemaViolation { .. }) => (
                status,
                Json(json!({
                    "error": "Model response could not be normalized",
                    "details": err.to_string(),
                    "raw_response": err.raw_response(),
                })),
            )
                .into_response(),
            AnalyzeError::EmptyModelResponse
            | AnalyzeError::Normalize(NormalizeError::EmptyInput) => (
                status,
                Json(json!({
                    "error": "Model returned an empty response",
                    "raw_response": null,
                })),
            )
                .into_response(),
            other => create_error(status, other.to_string()),
        }
    }
}

pub fn create_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub fn not_found(message: impl Into<String>) -> Response {
    create_error(StatusCode::NOT_FOUND, message)
}

pub fn method_not_allowed(message: impl Into<String>) -> Response {
    create_error(StatusCode::METHOD_NOT_ALLOWED, message)
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_content_type_is_bad_request() {
        let resp = AnalyzeError::InvalidContentType("text/plain".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("text/plain"));
    }

    #[tokio::test]
    async fn test_parse_failure_carries_raw_response() {
        let err = NormalizeError::ParseFailure {
            reason: "direct: expected value".to_string(),
            raw: "I think this is plastic.".to_string(),
        };
        let resp = AnalyzeError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(resp).await;
        assert_eq!(body["raw_response"], "I think this is plastic.");
        assert!(body["details"].as_str().unwrap().contains("expected value"));
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_schema_violation_is_unprocessable() {
        let err = NormalizeError::SchemaViolation {
            field: "kwetche",
            reason: "expected an integer".to_string(),
            raw: "{}".to_string(),
        };
        let resp = AnalyzeError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(resp).await;
        assert!(body["details"].as_str().unwrap().contains("kwetche"));
    }

    #[tokio::test]
    async fn test_empty_model_response_is_server_error() {
        let resp = AnalyzeError::EmptyModelResponse.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(body["raw_response"].is_null());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_server_error() {
        let err = ClientError::Status {
            status: 403,
            message: "API key not valid".to_string(),
        };
        let resp = AnalyzeError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("API key not valid"));
    }

    #[test]
    fn test_media_error_mapping() {
        let err = AnalyzeError::from(MediaError::Empty);
        assert!(matches!(err, AnalyzeError::ImageDecodeFailure(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_malformed_upload_keeps_status() {
        let err = AnalyzeError::MalformedUpload {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
