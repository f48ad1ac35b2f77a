use std::{sync::Arc, time::Instant};

use axum::{extract::Request, http::HeaderValue, response::Response};
use rand::{distr::Alphanumeric, Rng};
use tower::{Layer, Service};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{MakeSpan, OnRequest, OnResponse, TraceLayer},
};
use tracing::{field::Empty, info_span, Span};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub const DEFAULT_REQUEST_ID_HEADERS: [&str; 3] =
    ["x-request-id", "x-correlation-id", "request-id"];

fn generate_request_id(path: &str) -> String {
    let prefix = if path.starts_with("/analyze") {
        "anl-"
    } else {
        "req-"
    };

    let random_part: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();

    format!("{}{}", prefix, random_part)
}

/// Extension type for storing request ID
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Tower Layer for request ID middleware
#[derive(Clone)]
pub struct RequestIdLayer {
    headers: Arc<Vec<String>>,
}

impl RequestIdLayer {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers: Arc::new(headers),
        }
    }
}

impl Default for RequestIdLayer {
    fn default() -> Self {
        Self::new(
            DEFAULT_REQUEST_ID_HEADERS
                .iter()
                .map(|h| h.to_string())
                .collect(),
        )
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware {
            inner,
            headers: self.headers.clone(),
        }
    }
}

/// Tower Service for request ID middleware
#[derive(Clone)]
pub struct RequestIdMiddleware<S> {
    inner: S,
    headers: Arc<Vec<String>>,
}

impl<S> Service<Request> for RequestIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let request_id = self
            .headers
            .iter()
            .find_map(|name| req.headers().get(name).and_then(|v| v.to_str().ok()))
            .map(str::to_string)
            .unwrap_or_else(|| generate_request_id(req.uri().path()));

        req.extensions_mut().insert(RequestId(request_id.clone()));

        let method = req.method().clone();
        let uri = req.uri().clone();

        let future = self.inner.call(req);

        Box::pin(async move {
            let start_time = Instant::now();
            let mut response = future.await?;
            let latency = start_time.elapsed();

            response.headers_mut().insert(
                REQUEST_ID_HEADER,
                HeaderValue::from_str(&request_id)
                    .unwrap_or_else(|_| HeaderValue::from_static("invalid-request-id")),
            );

            let status = response.status();
            let span = info_span!(
                "http_request",
                method = %method,
                uri = %uri,
                request_id = %request_id,
                status = %status,
                latency = ?latency
            );

            let _enter = span.enter();
            if status.is_server_error() {
                tracing::error!(
                    target: "waste_classifier::response",
                    "request failed with server error"
                );
            } else if status.is_client_error() {
                tracing::warn!(
                    target: "waste_classifier::response",
                    "request failed with client error"
                );
            } else {
                tracing::info!(
                    target: "waste_classifier::response",
                    "finished processing request"
                );
            }

            Ok(response)
        })
    }
}

/// Create a configured TraceLayer for HTTP logging
/// Note: request/response log lines are emitted by RequestIdMiddleware
pub fn create_logging_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    RequestSpan,
    RequestLogger,
    ResponseLogger,
> {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_request(RequestLogger)
        .on_response(ResponseLogger)
}

#[derive(Clone, Debug)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
            request_id = Empty,
            status_code = Empty,
            latency = Empty,
        )
    }
}

#[derive(Clone, Debug)]
pub struct RequestLogger;

impl<B> OnRequest<B> for RequestLogger {
    fn on_request(&mut self, request: &Request<B>, span: &Span) {
        if let Some(request_id) = request.extensions().get::<RequestId>() {
            span.record("request_id", request_id.0.as_str());
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResponseLogger;

impl<B> OnResponse<B> for ResponseLogger {
    fn on_response(self, response: &Response<B>, latency: std::time::Duration, span: &Span) {
        span.record("status_code", response.status().as_u16());
        span.record("latency", format!("{:?}", latency));
    }
}
