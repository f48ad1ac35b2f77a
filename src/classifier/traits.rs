use async_trait::async_trait;

use crate::{classifier::errors::ClientResult, multimodal::ImageFrame};

/// Opaque multimodal model that describes an image in free-form text.
///
/// Implementations carry their own instruction prompt and credentials and
/// are shared read-only across all requests.
#[async_trait]
pub trait ClassificationClient: Send + Sync {
    /// Model identifier, used in logs and readiness output
    fn model_name(&self) -> &str;

    /// Send one image plus the configured prompt and return the raw text answer.
    ///
    /// An empty string means the model produced no text.
    async fn classify(&self, image: &ImageFrame) -> ClientResult<String>;
}
