//! config-bridge library.
//!
//! HTTP helper that converts configuration documents between YAML and JSON
//! for a browser-based editor, and serves the editor's static bundle.

pub mod cli;
pub mod config;
pub mod document;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod version;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
