//! Endpoint handlers.
//!
//! # Responsibilities
//! - Convert YAML text to a document (`/api/import`)
//! - Convert a document to YAML text (`/api/export`)
//! - Report liveness and build info
//! - Expose the Prometheus scrape
//!
//! Conversion handlers never hold state between requests. Each one reads
//! its body through the size guard, so a client cannot make the service
//! buffer more than the configured ceiling.

use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::document::{self, ConfigurationDocument};
use crate::http::request::{ExportRequest, ImportRequest, RequestId};
use crate::http::response::{ApiError, ExportResponse, HealthResponse, ImportResponse, InitResponse};
use crate::http::server::AppState;
use crate::observability::CodecOutcome;
use crate::security::limits::{check_document_size, read_body};
use crate::version;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// `POST /api/import`
pub async fn import_config(
    State(state): State<AppState>,
    request_id: RequestId,
    request: Request,
) -> Response {
    match import(&state, request).await {
        Ok(config) => {
            tracing::debug!(request_id = %request_id, "Config imported");
            Json(ImportResponse::success(config)).into_response()
        }
        Err(err) => {
            err.log(&request_id, "import");
            err.into_response()
        }
    }
}

async fn import(state: &AppState, request: Request) -> Result<ConfigurationDocument, ApiError> {
    let limits = &state.config.limits;
    let body = read_body(
        request.into_body(),
        limits.max_request_bytes(),
        state.config.timeouts.read,
    )
    .await?;

    let envelope: ImportRequest = serde_json::from_slice(&body)?;
    let text = envelope.config.unwrap_or_default();

    state.metrics.record_document_size(text.len());
    if let Err(err) = check_document_size(&text, limits.max_document_bytes()) {
        state.metrics.record_codec(CodecOutcome::SizeRejected, None);
        return Err(err.into());
    }

    let started = Instant::now();
    let decoded = document::decode(&text);
    let outcome = match decoded {
        Ok(_) => CodecOutcome::Success,
        Err(_) => CodecOutcome::ParseFailed,
    };
    state.metrics.record_codec(outcome, Some(started.elapsed()));

    decoded.map_err(ApiError::from)
}

/// `POST /api/export`
pub async fn export_config(
    State(state): State<AppState>,
    request_id: RequestId,
    request: Request,
) -> Response {
    match export(&state, request).await {
        Ok(yaml) => {
            tracing::debug!(request_id = %request_id, bytes = yaml.len(), "Config exported");
            Json(ExportResponse::success(yaml)).into_response()
        }
        Err(err) => {
            err.log(&request_id, "export");
            err.into_response()
        }
    }
}

async fn export(state: &AppState, request: Request) -> Result<String, ApiError> {
    let body = read_body(
        request.into_body(),
        state.config.limits.max_request_bytes(),
        state.config.timeouts.read,
    )
    .await?;

    let envelope: ExportRequest = serde_json::from_slice(&body)?;
    let config = envelope.config.ok_or(ApiError::MissingConfig)?;

    let started = Instant::now();
    let encoded = document::encode(&document::normalize(config));
    let elapsed = started.elapsed();

    match encoded {
        Ok(yaml) => {
            state.metrics.record_codec(CodecOutcome::Success, Some(elapsed));
            state.metrics.record_document_size(yaml.len());
            Ok(yaml)
        }
        Err(err) => {
            state.metrics.record_codec(CodecOutcome::EncodeFailed, Some(elapsed));
            Err(err.into())
        }
    }
}

/// `OPTIONS` on the conversion endpoints. CORS headers are added by the
/// route layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: version::VERSION,
        uptime: format_uptime(state.started_at.elapsed()),
    })
}

/// `GET /api/init`
pub async fn init() -> Json<InitResponse> {
    Json(InitResponse {
        version: version::VERSION,
        commit: version::COMMIT,
        date: version::DATE,
    })
}

/// `GET /metrics`
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

/// Render uptime as `1h2m3s`, dropping leading zero units.
fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, _) => format!("{minutes}m{seconds}s"),
        _ => format!("{hours}h{minutes}m{seconds}s"),
    }
}
