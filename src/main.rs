//! config-bridge
//!
//! Converts configuration documents between YAML and JSON for a
//! browser-based editor, and serves the editor's static bundle.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request ID ─▶ trace ─▶ metrics ─▶ timeout ─┬─▶ /api/import ─▶ size guard ─▶ YAML decode
//!                                                                ├─▶ /api/export ─▶ size guard ─▶ normalize ─▶ YAML encode
//!                                                                ├─▶ /api/health, /api/init, /metrics
//!                                                                └─▶ static bundle (contained, SPA fallback)
//!
//!     Cross-cutting: config (defaults → TOML → env → flags), structured
//!     logging, Prometheus metrics, graceful shutdown on SIGINT/SIGTERM.
//! ```

use clap::Parser;

use config_bridge::cli::Cli;
use config_bridge::lifecycle::{signals, startup, Shutdown};
use config_bridge::observability::logging;
use config_bridge::version;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (config, warnings) = startup::load_config(&cli)?;

    logging::init_logging(&config.observability)?;
    for warning in &warnings {
        tracing::warn!(key = warning.key, value = %warning.value, reason = %warning.reason, "Ignoring environment variable");
    }

    tracing::info!(
        version = version::VERSION,
        commit = version::COMMIT,
        date = version::DATE,
        "config-bridge starting"
    );
    tracing::info!(
        address = %config.listener.socket_addr(),
        static_dir = %config.static_files.root.display(),
        max_request_size_mb = config.limits.max_request_size_mb,
        max_document_size_mb = config.limits.max_document_size_mb,
        "Configuration loaded"
    );

    let (server, listener) = startup::prepare(config).await?;

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
