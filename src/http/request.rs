//! Request identification and inbound envelopes.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID when the client did not send one
//! - Expose the request ID to handlers as an explicit extractor
//! - Define the JSON envelopes accepted by the conversion endpoints
//!
//! # Design Decisions
//! - Request ID assigned as early as possible (outermost layer)
//! - An inbound `X-Request-ID` is reused verbatim and echoed back

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderName, HeaderValue, Request};
use serde::Deserialize;
use tower_http::request_id::{MakeRequestId, RequestId as TaggedRequest};
use uuid::Uuid;

use crate::document::ConfigurationDocument;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a fresh UUID v4 for requests without an inbound ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TaggedRequest> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(TaggedRequest::new)
    }
}

/// The request ID of the current request, as a handler argument.
///
/// Falls back to `"unknown"` when the request-ID layer is not installed or
/// the header is not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Read the ID the request-ID layer stored on the request.
    pub fn from_extensions(extensions: &Extensions) -> Self {
        let id = extensions
            .get::<TaggedRequest>()
            .and_then(|tagged| tagged.header_value().to_str().ok())
            .unwrap_or("unknown");
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_extensions(&parts.extensions))
    }
}

/// Body of `POST /api/import`.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// YAML text. Missing and `null` both mean "empty document".
    #[serde(default)]
    pub config: Option<String>,
}

/// Body of `POST /api/export`.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub config: Option<ConfigurationDocument>,
}
