use std::sync::Arc;

use axum::Router;
use waste_classifier::{
    app_context::AppContext,
    classifier::ClassificationClient,
    config::AnalyzerConfig,
    middleware::DEFAULT_REQUEST_ID_HEADERS,
    normalizer::ResponseNormalizer,
    server::{build_app, AppState},
};

/// Build the full router around the given client, as `startup` would.
pub fn create_test_app(client: Arc<dyn ClassificationClient>) -> Router {
    create_test_app_with_limit(client, 20 * 1024 * 1024)
}

pub fn create_test_app_with_limit(
    client: Arc<dyn ClassificationClient>,
    max_payload_size: usize,
) -> Router {
    let mut config = AnalyzerConfig::new("test-key");
    config.max_payload_size = max_payload_size;

    let context = AppContext::new(client, ResponseNormalizer::new(), config);
    let app_state = Arc::new(AppState::new(context));

    build_app(
        app_state,
        max_payload_size,
        DEFAULT_REQUEST_ID_HEADERS
            .iter()
            .map(|h| h.to_string())
            .collect(),
    )
}
