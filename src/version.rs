//! Build information reported by `/api/init` and `/api/health`.
//!
//! `BUILD_COMMIT` and `BUILD_DATE` are read from the environment at
//! compile time, e.g. `BUILD_COMMIT=$(git rev-parse --short HEAD) cargo build`.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const COMMIT: &str = match option_env!("BUILD_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

pub const DATE: &str = match option_env!("BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};
