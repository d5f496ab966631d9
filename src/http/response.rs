//! Response envelopes and error mapping.
//!
//! # Responsibilities
//! - Define the JSON bodies returned by every API endpoint
//! - Map conversion failures to HTTP status codes
//! - Log each failure at a level matching who caused it
//!
//! # Design Decisions
//! - Every failure uses the `{success:false, error}` envelope
//! - Client-caused errors log at WARN, server faults at ERROR

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::document::{CodecError, ConfigurationDocument};
use crate::http::request::RequestId;
use crate::security::limits::LimitError;

/// Body of a successful `POST /api/import`.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub config: ConfigurationDocument,
}

impl ImportResponse {
    pub fn success(config: ConfigurationDocument) -> Self {
        Self {
            success: true,
            config,
        }
    }
}

/// Body of a successful `POST /api/export`.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub yaml: String,
}

impl ExportResponse {
    pub fn success(yaml: String) -> Self {
        Self {
            success: true,
            yaml,
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime: String,
}

/// Body of `GET /api/init`.
#[derive(Debug, Serialize)]
pub struct InitResponse {
    pub version: &'static str,
    pub commit: &'static str,
    pub date: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// Everything a conversion endpoint can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not the expected JSON envelope.
    #[error("Invalid request: {0}")]
    EnvelopeMalformed(#[from] serde_json::Error),

    /// Export was called without a document.
    #[error("Config is required")]
    MissingConfig,

    #[error(transparent)]
    Limit(#[from] LimitError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EnvelopeMalformed(_) | ApiError::MissingConfig => StatusCode::BAD_REQUEST,
            ApiError::Limit(LimitError::Timeout(_)) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Limit(_) => StatusCode::BAD_REQUEST,
            ApiError::Codec(CodecError::Parse(_)) => StatusCode::BAD_REQUEST,
            ApiError::Codec(CodecError::Encode(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure points at a bug in this service rather than at
    /// the client's input.
    pub fn is_server_fault(&self) -> bool {
        self.status().is_server_error()
    }

    /// Byte count and limit of a rejected document.
    pub fn document_size(&self) -> Option<(usize, usize)> {
        match self {
            ApiError::Limit(LimitError::DocumentTooLarge { size, limit }) => Some((*size, *limit)),
            _ => None,
        }
    }

    /// Emit the log line for this failure.
    pub fn log(&self, request_id: &RequestId, operation: &'static str) {
        if let Some((size, limit)) = self.document_size() {
            tracing::warn!(
                request_id = %request_id,
                operation,
                size_bytes = size,
                max_bytes = limit,
                error = %self,
                "Request rejected"
            );
        } else if self.is_server_fault() {
            tracing::error!(request_id = %request_id, operation, error = %self, "Request failed");
        } else {
            tracing::warn!(request_id = %request_id, operation, error = %self, "Request rejected");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
