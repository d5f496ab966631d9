//! Command-line flags.
//!
//! Flags are the highest-precedence configuration layer: they override the
//! TOML file and the environment.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ServiceConfig;

#[derive(Debug, Default, Parser)]
#[command(name = "config-bridge")]
#[command(version, about = "Converts configuration documents between YAML and JSON for the web editor", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding the web UI bundle
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut ServiceConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(dir) = &self.static_dir {
            config.static_files.root = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}
