//! Image upload handling for the analyze endpoint

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::{debug, info};

use crate::{
    app_context::AppContext,
    multimodal::{decode_image, is_image_content_type},
    protocols::classification::ClassificationResult,
    routers::error::AnalyzeError,
    server::AppState,
};

const FILE_FIELD: &str = "file";

/// A single file part pulled from the multipart body.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ImageUpload {
    pub fn new(content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            content_type: Some(content_type.into()),
            data: data.into(),
        }
    }
}

pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let result = match multipart {
        Ok(multipart) => match read_upload(multipart).await {
            Ok(upload) => analyze_upload(&state.context, upload).await,
            Err(e) => Err(e),
        },
        Err(rejection) => Err(AnalyzeError::MalformedUpload {
            status: rejection.status(),
            message: rejection.body_text(),
        }),
    };

    match result {
        Ok(classification) => Json(classification).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Take the single part that carries a file name or is named `file`.
///
/// Non-file fields are skipped. A second file part fails the whole upload.
pub async fn read_upload(mut multipart: Multipart) -> Result<ImageUpload, AnalyzeError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.file_name().is_none() && field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Skipping non-file multipart field");
            continue;
        }

        if upload.is_some() {
            return Err(AnalyzeError::MalformedUpload {
                status: StatusCode::BAD_REQUEST,
                message: "Expected exactly one file upload per request".to_string(),
            });
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(malformed)?;

        upload = Some(ImageUpload {
            file_name,
            content_type,
            data,
        });
    }

    upload.ok_or(AnalyzeError::MissingFile)
}

fn malformed(err: MultipartError) -> AnalyzeError {
    AnalyzeError::MalformedUpload {
        status: err.status(),
        message: err.body_text(),
    }
}

/// Validate, decode and classify one upload.
///
/// Exactly one model call is made for an upload that passes the content-type
/// and decode checks; none otherwise.
pub async fn analyze_upload(
    context: &AppContext,
    upload: ImageUpload,
) -> Result<ClassificationResult, AnalyzeError> {
    let content_type = upload.content_type.as_deref().unwrap_or_default();
    if !is_image_content_type(content_type) {
        let declared = if content_type.is_empty() {
            "<none>"
        } else {
            content_type
        };
        return Err(AnalyzeError::InvalidContentType(declared.to_string()));
    }

    let frame = decode_image(upload.data).await?;
    info!(
        file_name = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        declared_type = content_type,
        detected_type = frame.mime_type(),
        width = frame.width(),
        height = frame.height(),
        "Classifying uploaded image"
    );

    let raw = context.client.classify(&frame).await?;
    if raw.trim().is_empty() {
        return Err(AnalyzeError::EmptyModelResponse);
    }
    debug!(raw_len = raw.len(), "Received model response");

    let result = context.normalizer.normalize(&raw)?;
    info!(
        recyclable = result.recyclable,
        waste_type = ?result.waste_type,
        score = ?result.score,
        "Classification complete"
    );
    Ok(result)
}
