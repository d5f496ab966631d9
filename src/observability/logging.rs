//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Choose JSON or human-readable output
//! - Apply the configured level unless `RUST_LOG` overrides it

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Error returned when a global subscriber is already installed.
#[derive(Debug, thiserror::Error)]
#[error("failed to initialize logging: {0}")]
pub struct LoggingError(#[from] tracing_subscriber::util::TryInitError);

/// Build the level filter: `RUST_LOG` first, then the configured level.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config
            .log_level
            .parse::<tracing::Level>()
            .unwrap_or(tracing::Level::INFO);
        EnvFilter::new(level.as_str().to_ascii_lowercase())
    })
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()?,
    }

    Ok(())
}
