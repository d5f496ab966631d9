//! Per-request metrics.

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::http::request::RequestId;
use crate::observability::Metrics;

/// Label used for requests that matched no explicit route.
const UNMATCHED_ENDPOINT: &str = "/";

/// Count the request, time it and track it as in flight.
///
/// The endpoint label is the route template, never the raw path, so
/// static file requests cannot blow up label cardinality.
pub async fn observe_request(
    State(metrics): State<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let _in_flight = metrics.track_in_flight();
    let started = Instant::now();

    let method = request.method().clone();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_owned());
    let request_id = RequestId::from_extensions(request.extensions());

    let response = next.run(request).await;
    let elapsed = started.elapsed();
    let status = response.status();

    metrics.record_request(method.as_str(), &endpoint, status.as_u16(), elapsed);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        endpoint = %endpoint,
        status = status.as_u16(),
        duration_ms = elapsed.as_millis() as u64,
        "Request completed"
    );

    response
}
