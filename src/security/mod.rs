//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Conversion request:
//!     → limits.rs (body ceiling + read timeout, then document ceiling)
//!     → Pass to codec
//!
//! Static request:
//!     → paths.rs (clean path, containment check)
//!     → Pass to file server
//! ```
//!
//! # Design Decisions
//! - Fail closed: anything outside the root is simply not found
//! - No trust in client input sizes; limits hold before parsing

pub mod limits;
pub mod paths;
