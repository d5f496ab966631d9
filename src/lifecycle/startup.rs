//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration from every layer and validate it
//! - Build the metrics registry and discover the static root
//! - Bind the listener last
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Environment warnings are returned, not logged, because logging is
//!   configured from the result

use std::io;
use std::net::SocketAddr;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::cli::Cli;
use crate::config::{self, ConfigError, EnvWarning, ServiceConfig, ValidationError};
use crate::http::{HttpServer, StaticAssets};
use crate::observability::Metrics;

/// Fatal errors before the server starts accepting traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Validation(Vec<ValidationError>),

    #[error("failed to build metrics recorder: {0}")]
    Metrics(#[from] BuildError),

    #[error("static directory unusable: {0}")]
    StaticRoot(#[source] io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Resolve the effective configuration: defaults, then the TOML file, then
/// the process environment, then CLI flags.
pub fn load_config(cli: &Cli) -> Result<(ServiceConfig, Vec<EnvWarning>), StartupError> {
    resolve_config(cli, |key| std::env::var(key).ok())
}

fn resolve_config<F>(cli: &Cli, env: F) -> Result<(ServiceConfig, Vec<EnvWarning>), StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ServiceConfig::default(),
    };

    let warnings = config::apply_env(&mut config, env);
    cli.apply(&mut config);

    config::validate_config(&config).map_err(StartupError::Validation)?;
    Ok((config, warnings))
}

/// Build the server and bind its listener.
pub async fn prepare(config: ServiceConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    let metrics = Metrics::new()?;
    let assets = StaticAssets::discover(&config.static_files.root).map_err(StartupError::StaticRoot)?;
    if let Some(assets) = &assets {
        tracing::info!(root = %assets.root().display(), "Serving static files");
    }

    let addr = config.listener.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    Ok((HttpServer::new(config, metrics, assets), listener))
}
