//! Configuration validation.
//!
//! Serde handles syntax; this checks value ranges. All problems are
//! reported together rather than stopping at the first one.

use std::time::Duration;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a [`ServiceConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("{field} timeout must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.limits.max_request_size_mb == 0 {
        errors.push(ValidationError::ZeroLimit {
            field: "max_request_size_mb",
        });
    }
    if config.limits.max_document_size_mb == 0 {
        errors.push(ValidationError::ZeroLimit {
            field: "max_document_size_mb",
        });
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("read", timeouts.read),
        ("write", timeouts.write),
        ("idle", timeouts.idle),
        ("shutdown", timeouts.shutdown),
    ] {
        if value == Duration::ZERO {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    if config
        .observability
        .log_level
        .parse::<tracing::Level>()
        .is_err()
    {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
