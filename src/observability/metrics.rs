//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, endpoint, status
//! - `http_request_duration_seconds` (histogram): latency distribution
//! - `http_requests_in_flight` (gauge): requests currently being handled
//! - `yaml_parse_total` (counter): codec operations by outcome
//! - `yaml_parse_duration_seconds` (histogram): codec latency
//! - `yaml_size_bytes` (histogram): inbound and generated YAML sizes
//!
//! # Design Decisions
//! - Each [`Metrics`] owns its own Prometheus recorder instead of installing
//!   a global one, so handlers and tests get isolated registries
//! - Metric updates are atomic operations; no locks on the request path
//! - The in-flight gauge is released by a drop guard on every exit path

use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge, histogram, Gauge};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const HTTP_REQUESTS_IN_FLIGHT: &str = "http_requests_in_flight";
pub const YAML_PARSE_TOTAL: &str = "yaml_parse_total";
pub const YAML_PARSE_DURATION: &str = "yaml_parse_duration_seconds";
pub const YAML_SIZE_BYTES: &str = "yaml_size_bytes";

const HTTP_DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
const CODEC_DURATION_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0];
const YAML_SIZE_BUCKETS: &[f64] = &[1024.0, 10240.0, 102400.0, 1024000.0, 10240000.0, 102400000.0];

/// Outcome label for codec operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecOutcome {
    Success,
    SizeRejected,
    ParseFailed,
    EncodeFailed,
}

impl CodecOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodecOutcome::Success => "success",
            CodecOutcome::SizeRejected => "error_size",
            CodecOutcome::ParseFailed => "error_parse",
            CodecOutcome::EncodeFailed => "error_marshal",
        }
    }
}

/// Shared metrics registry handed to every handler through app state.
#[derive(Clone)]
pub struct Metrics {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl Metrics {
    /// Build a registry with the histogram buckets used by this service.
    pub fn new() -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(HTTP_REQUEST_DURATION.to_string()), HTTP_DURATION_BUCKETS)?
            .set_buckets_for_metric(Matcher::Full(YAML_PARSE_DURATION.to_string()), CODEC_DURATION_BUCKETS)?
            .set_buckets_for_metric(Matcher::Full(YAML_SIZE_BYTES.to_string()), YAML_SIZE_BUCKETS)?
            .build_recorder();
        let handle = recorder.handle();

        Ok(Self {
            recorder: Arc::new(recorder),
            handle,
        })
    }

    fn scoped<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(self.recorder.as_ref(), f)
    }

    /// Record a completed HTTP request.
    pub fn record_request(&self, method: &str, endpoint: &str, status: u16, elapsed: Duration) {
        let labels = [
            ("method", method.to_string()),
            ("endpoint", endpoint.to_string()),
            ("status", status.to_string()),
        ];
        self.scoped(|| {
            counter!(HTTP_REQUESTS_TOTAL, &labels).increment(1);
            histogram!(HTTP_REQUEST_DURATION, &labels).record(elapsed.as_secs_f64());
        });
    }

    /// Mark a request as in flight until the returned guard is dropped.
    pub fn track_in_flight(&self) -> InFlightGuard {
        let gauge = self.scoped(|| gauge!(HTTP_REQUESTS_IN_FLIGHT));
        gauge.increment(1.0);
        InFlightGuard { gauge }
    }

    /// Record the outcome and duration of a decode or encode.
    pub fn record_codec(&self, outcome: CodecOutcome, elapsed: Option<Duration>) {
        self.scoped(|| {
            counter!(YAML_PARSE_TOTAL, "status" => outcome.as_str()).increment(1);
            if let Some(elapsed) = elapsed {
                histogram!(YAML_PARSE_DURATION).record(elapsed.as_secs_f64());
            }
        });
    }

    /// Record the size of a YAML document, inbound or generated.
    pub fn record_document_size(&self, bytes: usize) {
        self.scoped(|| histogram!(YAML_SIZE_BYTES).record(bytes as f64));
    }

    /// Render the Prometheus text exposition.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Guard that keeps the in-flight gauge raised for one request.
/// Decrements the gauge when dropped, including during unwinding or
/// when the request future is cancelled.
pub struct InFlightGuard {
    gauge: Gauge,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.decrement(1.0);
    }
}
