//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::config::duration::parse_duration;
use crate::config::schema::{LogFormat, ServiceConfig};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// An environment variable that was set but could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvWarning {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl std::fmt::Display for EnvWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ignoring {}='{}': {}", self.key, self.value, self.reason)
    }
}

/// Load configuration from a TOML file. Missing sections keep defaults.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts `std::env::var` so tests can inject values. Unset or
/// empty variables are skipped; unusable values leave the current setting
/// in place and are reported back as warnings.
pub fn apply_env<F>(config: &mut ServiceConfig, lookup: F) -> Vec<EnvWarning>
where
    F: Fn(&str) -> Option<String>,
{
    let mut overlay = EnvOverlay {
        lookup,
        warnings: Vec::new(),
    };

    overlay.parsed("PORT", &mut config.listener.port, |v| {
        u16::from_str(v).map_err(|e| e.to_string())
    });
    overlay.parsed("LOG_LEVEL", &mut config.observability.log_level, |v| {
        v.parse::<tracing::Level>()
            .map(|_| v.to_string())
            .map_err(|e| e.to_string())
    });
    overlay.parsed("LOG_FORMAT", &mut config.observability.log_format, |v| {
        v.parse::<LogFormat>()
    });
    overlay.parsed("MAX_REQUEST_SIZE_MB", &mut config.limits.max_request_size_mb, positive);
    overlay.parsed("MAX_YAML_SIZE_MB", &mut config.limits.max_document_size_mb, positive);
    overlay.parsed("READ_TIMEOUT", &mut config.timeouts.read, parse_duration);
    overlay.parsed("WRITE_TIMEOUT", &mut config.timeouts.write, parse_duration);
    overlay.parsed("IDLE_TIMEOUT", &mut config.timeouts.idle, parse_duration);
    overlay.parsed("SHUTDOWN_TIMEOUT", &mut config.timeouts.shutdown, parse_duration);
    overlay.parsed("STATIC_DIR", &mut config.static_files.root, |v| {
        Ok(PathBuf::from(v))
    });

    overlay.warnings
}

fn positive(value: &str) -> Result<usize, String> {
    match usize::from_str(value) {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

struct EnvOverlay<F> {
    lookup: F,
    warnings: Vec<EnvWarning>,
}

impl<F> EnvOverlay<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn parsed<T, P>(&mut self, key: &'static str, target: &mut T, parse: P)
    where
        P: FnOnce(&str) -> Result<T, String>,
    {
        let Some(raw) = (self.lookup)(key) else {
            return;
        };
        let value = raw.trim();
        if value.is_empty() {
            return;
        }
        match parse(value) {
            Ok(parsed) => *target = parsed,
            Err(reason) => self.warnings.push(EnvWarning {
                key,
                value: raw.clone(),
                reason,
            }),
        }
    }
}
