//! Request spans.
//!
//! `TraceLayer` opens one span per request. The span carries the request ID
//! so every event logged while handling the request can be correlated with
//! the `X-Request-ID` response header.

use axum::http::Request;
use tower_http::trace::MakeSpan;
use tracing::Span;

use crate::http::request::X_REQUEST_ID;

/// [`MakeSpan`] that records method, path and request ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");

        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id,
        )
    }
}
