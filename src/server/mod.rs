//! HTTP surface.
//!
//! `POST /classify` accepts `{"input_email_body": "..."}` and answers with
//! the classification record; `GET /health` reports liveness. Masking and
//! classification call blocking model clients, so each request runs on the
//! blocking pool.

use crate::config::ServerSettings;
use crate::models::ClassificationRecord;
use crate::observability::{REQUEST_ID_HEADER, RequestContext};
use crate::services::TriageService;
use crate::{Error, Result};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body size (1 MiB).
pub const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
struct AppState {
    service: Arc<TriageService>,
}

/// Builds the router with security headers and request tracing.
pub fn router(service: Arc<TriageService>) -> Router {
    Router::new()
        .route("/classify", post(classify))
        .route("/health", get(health))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

/// Runs the server until Ctrl-C.
///
/// Builds its own runtime. The caller keeps `service` alive past the
/// runtime so blocking model clients are never dropped on an async worker.
///
/// # Errors
///
/// Returns an error if the runtime cannot start, the address cannot be bound,
/// or the server fails.
pub fn run(settings: &ServerSettings, service: &Arc<TriageService>) -> Result<()> {
    let addr = (settings.host.as_str(), settings.port)
        .to_socket_addrs()
        .map_err(|e| Error::InvalidInput(format!("invalid bind address: {e}")))?
        .next()
        .ok_or_else(|| {
            Error::InvalidInput(format!("{} resolves to no address", settings.host))
        })?;

    let rt = tokio::runtime::Runtime::new().map_err(|e| Error::OperationFailed {
        operation: "create_runtime".to_string(),
        cause: e.to_string(),
    })?;

    let app = router(Arc::clone(service));
    rt.block_on(serve(addr, app))
}

/// Binds `addr` and serves `app` with graceful shutdown on Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "bind".to_string(),
            cause: format!("{addr}: {e}"),
        })?;

    tracing::info!(%addr, "Starting email triage HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "serve".to_string(),
            cause: e.to_string(),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down HTTP server");
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn classify(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    let context = RequestContext::from_header(
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
    );
    let span = context.span("/classify");

    let mut response = handle_classify(&state, body, span).await;
    if let Ok(value) = HeaderValue::from_str(context.request_id()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

async fn handle_classify(state: &AppState, body: Body, span: tracing::Span) -> Response {
    let Ok(bytes) = axum::body::to_bytes(body, MAX_REQUEST_BODY_SIZE).await else {
        span.in_scope(|| {
            tracing::warn!(
                max_size = MAX_REQUEST_BODY_SIZE,
                "Request body exceeds maximum size limit"
            );
        });
        metrics::counter!("triage_requests_total", "status" => "too_large").increment(1);
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("Request body too large (max: {MAX_REQUEST_BODY_SIZE} bytes)"),
        );
    };

    let payload: Value = match serde_json::from_slice(&bytes) {
        Ok(payload) => payload,
        Err(e) => {
            span.in_scope(|| tracing::warn!(error = %e, "Rejected malformed JSON"));
            metrics::counter!("triage_requests_total", "status" => "invalid").increment(1);
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid JSON: {e}"));
        },
    };

    let service = Arc::clone(&state.service);
    let outcome =
        tokio::task::spawn_blocking(move || span.in_scope(|| service.handle_payload(&payload)))
            .await;

    match outcome {
        Ok(result) => record_response(result),
        Err(e) => {
            tracing::error!(error = %e, "Triage task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
        },
    }
}

fn record_response(result: Result<ClassificationRecord>) -> Response {
    match result {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e @ (Error::MissingField(_) | Error::InvalidInput(_))) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        },
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}
