//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs::load_config)
//!     → environment variables (loader.rs::apply_env)
//!     → CLI flags (cli.rs)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared via Arc with the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow an empty environment
//! - Unusable environment values are warnings, not startup failures
//! - Validation separates syntactic (serde) from semantic checks

pub mod duration;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env, load_config, ConfigError, EnvWarning};
pub use schema::{
    LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServiceConfig,
    StaticFilesConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
