use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::{signal, spawn};
use tracing::{debug, info};

use crate::{
    app_context::AppContext,
    config::AnalyzerConfig,
    middleware::{self, DEFAULT_REQUEST_ID_HEADERS},
    observability::logging::{self, LoggingConfig},
    routers::{
        analyze_image,
        error::{method_not_allowed, not_found},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub context: Arc<AppContext>,
}

impl AppState {
    pub fn new(context: AppContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }
}

async fn sink_handler() -> Response {
    not_found("Not found")
}

async fn analyze_method_not_allowed() -> Response {
    method_not_allowed("Method not allowed, use POST with a multipart file upload")
}

async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

async fn health(_state: State<Arc<AppState>>) -> Response {
    liveness().await
}

async fn readiness(State(state): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "model": state.context.client.model_name(),
        })),
    )
        .into_response()
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub analyzer_config: AnalyzerConfig,
    pub log_json: bool,
    pub request_id_headers: Option<Vec<String>>,
    pub shutdown_grace_period_secs: u64,
}

impl ServerConfig {
    pub fn new(analyzer_config: AnalyzerConfig) -> Self {
        Self {
            analyzer_config,
            log_json: false,
            request_id_headers: None,
            shutdown_grace_period_secs: 10,
        }
    }
}

pub fn build_app(
    app_state: Arc<AppState>,
    max_payload_size: usize,
    request_id_headers: Vec<String>,
) -> Router {
    let analyze_routes = Router::new()
        .route(
            "/analyze/",
            post(analyze_image).fallback(analyze_method_not_allowed),
        )
        .route(
            "/analyze",
            post(analyze_image).fallback(analyze_method_not_allowed),
        );

    let public_routes = Router::new()
        .route("/liveness", get(liveness))
        .route("/readiness", get(readiness))
        .route("/health", get(health));

    Router::new()
        .merge(analyze_routes)
        .merge(public_routes)
        .fallback(sink_handler)
        .layer(axum::extract::DefaultBodyLimit::max(max_payload_size))
        .layer(middleware::create_logging_layer())
        .layer(middleware::RequestIdLayer::new(request_id_headers))
        .with_state(app_state)
}

pub async fn startup(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let analyzer_config = config.analyzer_config;

    let _log_guard = logging::init_logging(LoggingConfig {
        level: logging::parse_level(analyzer_config.log_level.as_deref()),
        json_format: config.log_json,
        log_dir: analyzer_config.log_dir.clone(),
        colorize: !config.log_json,
        log_targets: Some(vec![
            "waste_classifier".to_string(),
            "tower_http".to_string(),
            "axum".to_string(),
        ]),
        ..Default::default()
    });

    info!(
        model = %analyzer_config.model.model,
        api_base = %analyzer_config.model.api_base,
        max_payload_size = analyzer_config.max_payload_size,
        "Starting waste classifier"
    );
    debug!(config = ?analyzer_config, "Resolved configuration");

    let bind_addr = format!("{}:{}", analyzer_config.host, analyzer_config.port);
    let max_payload_size = analyzer_config.max_payload_size;

    let app_context = AppContext::from_config(analyzer_config)?;
    let app_state = Arc::new(AppState::new(app_context));

    let request_id_headers = config.request_id_headers.unwrap_or_else(|| {
        DEFAULT_REQUEST_ID_HEADERS
            .iter()
            .map(|h| h.to_string())
            .collect()
    });

    let app = build_app(app_state, max_payload_size, request_id_headers);

    info!("Starting server on {}", bind_addr);
    let addr: std::net::SocketAddr = bind_addr
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let handle = axum_server::Handle::new();
    let handle_clone = handle.clone();
    let grace_period = Duration::from_secs(config.shutdown_grace_period_secs);
    spawn(async move {
        shutdown_signal().await;
        handle_clone.graceful_shutdown(Some(grace_period));
    });

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
