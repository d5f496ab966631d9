//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::duration;

const MEGABYTE: usize = 1024 * 1024;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Request and document size ceilings.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Static web bundle settings.
    pub static_files: StaticFilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: IpAddr,

    /// TCP port. `0` asks the OS for an ephemeral port.
    pub port: u16,
}

impl ListenerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 9485,
        }
    }
}

/// Size ceilings, expressed in megabytes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Ceiling for the whole request body.
    pub max_request_size_mb: usize,

    /// Ceiling for the YAML text embedded in an import request.
    pub max_document_size_mb: usize,
}

impl LimitsConfig {
    pub fn max_request_bytes(&self) -> usize {
        self.max_request_size_mb.saturating_mul(MEGABYTE)
    }

    pub fn max_document_bytes(&self) -> usize {
        self.max_document_size_mb.saturating_mul(MEGABYTE)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size_mb: 10,
            max_document_size_mb: 5,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time allowed to receive a request body.
    #[serde(with = "duration::text")]
    pub read: Duration,

    /// Time allowed to produce a response.
    #[serde(with = "duration::text")]
    pub write: Duration,

    /// Time a kept-alive connection may wait for its next request.
    #[serde(with = "duration::text")]
    pub idle: Duration,

    /// Grace period for draining connections on shutdown.
    #[serde(with = "duration::text")]
    pub shutdown: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(15),
            write: Duration::from_secs(15),
            idle: Duration::from_secs(60),
            shutdown: Duration::from_secs(10),
        }
    }
}

/// Static web bundle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory holding the built web UI. Serving is disabled if missing.
    pub root: PathBuf,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/var/www/config-bridge"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
        }
    }
}
