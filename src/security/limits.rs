//! Request and document size limits.
//!
//! # Responsibilities
//! - Read a request body up to a byte ceiling, never buffering past it
//! - Bound the time spent receiving the body
//! - Check the embedded document text against its own ceiling
//!
//! # Design Decisions
//! - The body ceiling covers the whole JSON envelope
//! - The document ceiling is checked before any YAML parsing happens
//! - Both ceilings are reported in whole megabytes to callers

use std::time::Duration;

use axum::body::{Body, Bytes};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use thiserror::Error;

const MEGABYTE: usize = 1024 * 1024;

/// Errors raised while enforcing limits.
#[derive(Debug, Error)]
pub enum LimitError {
    /// The request body exceeded the envelope ceiling.
    #[error("Invalid request: request body exceeds maximum size of {} MB", .limit / MEGABYTE)]
    RequestTooLarge { limit: usize },

    /// The body did not arrive within the read timeout.
    #[error("Invalid request: request body not received within {0:?}")]
    Timeout(Duration),

    /// The connection failed while the body was being read.
    #[error("Invalid request: {0}")]
    Read(String),

    /// The embedded YAML text exceeded the document ceiling.
    #[error("YAML config exceeds maximum size of {} MB", .limit / MEGABYTE)]
    DocumentTooLarge { size: usize, limit: usize },
}

/// Read `body` into memory, failing once more than `limit` bytes arrive.
pub async fn read_body(body: Body, limit: usize, read_timeout: Duration) -> Result<Bytes, LimitError> {
    let collect = Limited::new(body, limit).collect();

    match tokio::time::timeout(read_timeout, collect).await {
        Ok(Ok(collected)) => Ok(collected.to_bytes()),
        Ok(Err(err)) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(LimitError::RequestTooLarge { limit })
        }
        Ok(Err(err)) => Err(LimitError::Read(err.to_string())),
        Err(_) => Err(LimitError::Timeout(read_timeout)),
    }
}

/// Reject document text longer than `limit` bytes. The boundary is inclusive.
pub fn check_document_size(text: &str, limit: usize) -> Result<(), LimitError> {
    if text.len() > limit {
        return Err(LimitError::DocumentTooLarge {
            size: text.len(),
            limit,
        });
    }
    Ok(())
}
