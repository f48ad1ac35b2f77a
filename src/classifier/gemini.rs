//! Google Gemini `generateContent` client.
//!
//! Reference: https://ai.google.dev/api/generate-content

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    classifier::{
        errors::{ClientError, ClientResult},
        traits::ClassificationClient,
    },
    config::ModelConfig,
    multimodal::ImageFrame,
};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Part<'a> {
    InlineData { mime_type: &'a str, data: String },
    Text(&'a str),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Gemini-backed [`ClassificationClient`].
///
/// Built once at startup; the prompt and API key never change afterwards.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    prompt: Arc<str>,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: &ModelConfig, prompt: impl Into<Arc<str>>) -> ClientResult<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(50)))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.api_base.trim_end_matches('/'),
                config.model
            ),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            prompt: prompt.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    fn request_body<'a>(&'a self, image: &'a ImageFrame) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::InlineData {
                        mime_type: image.mime_type(),
                        data: BASE64_STANDARD.encode(&image.raw),
                    },
                    Part::Text(&self.prompt),
                ],
            }],
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else {
            ClientError::Http(err)
        }
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> String {
    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            warn!(block_reason = %reason, "Model blocked the prompt");
        }
        return String::new();
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            debug!(finish_reason = %reason, "Model finished with non-STOP reason");
        }
    }

    candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Pull a readable message out of an error response body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[async_trait]
impl ClassificationClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn classify(&self, image: &ImageFrame) -> ClientResult<String> {
        debug!(
            model = %self.model,
            mime_type = image.mime_type(),
            width = image.width(),
            height = image.height(),
            "Sending image to model"
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.request_body(image))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let response: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        Ok(extract_text(response))
    }
}
