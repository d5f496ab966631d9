//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request produces:
//!     → tracing.rs (span tagged with the request ID)
//!     → metrics.rs (counters, gauges, histograms)
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → stdout (JSON lines or pretty text)
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through spans and handler logs
//! - Metrics are cheap (atomic increments) and injected, not global

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::metrics::{CodecOutcome, InFlightGuard, Metrics};
