// Mock generateContent endpoint for exercising the Gemini client
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;

/// A request the mock server received.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub path_model: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: Value,
    delay_ms: u64,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockGeminiServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    shutdown_handle: Option<tokio::task::JoinHandle<()>>,
}

impl MockGeminiServer {
    /// Start a server that always answers with `status` and `reply`.
    pub async fn start(status: StatusCode, reply: Value) -> Self {
        Self::start_with_delay(status, reply, 0).await
    }

    pub async fn start_with_delay(status: StatusCode, reply: Value, delay_ms: u64) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            reply,
            delay_ms,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1beta/models/{model}", post(generate_content))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                eprintln!("Mock Gemini server error: {}", e);
            }
        });

        Self {
            url: format!("http://127.0.0.1:{}", port),
            requests,
            shutdown_tx: Some(shutdown_tx),
            shutdown_handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn stop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(handle) = self.shutdown_handle.take() {
            let _ = tokio::time::timeout(tokio::time::Duration::from_secs(5), handle).await;
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
    }
}

async fn generate_content(
    State(state): State<MockState>,
    Path(model): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        path_model: model,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    if state.delay_ms > 0 {
        tokio::time::sleep(tokio::time::Duration::from_millis(state.delay_ms)).await;
    }

    (state.status, Json(state.reply)).into_response()
}

/// A successful generateContent body whose text is split across `parts`.
pub fn text_reply(parts: &[&str]) -> Value {
    let parts: Vec<Value> = parts
        .iter()
        .map(|text| serde_json::json!({ "text": text }))
        .collect();
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 300, "candidatesTokenCount": 60 }
    })
}
