//! Configuration document subsystem.
//!
//! # Data Flow
//! ```text
//! Import (YAML → JSON):
//!     YAML text
//!     → codec.rs (decode, unknown keys ignored)
//!     → ConfigurationDocument
//!     → JSON response
//!
//! Export (JSON → YAML):
//!     ConfigurationDocument (from JSON envelope)
//!     → normalize.rs (drop empty collections)
//!     → codec.rs (encode)
//!     → YAML text
//! ```
//!
//! # Design Decisions
//! - Documents are request-local values; nothing here holds shared state
//! - Opaque substructures (action arguments, dashboard contents) are kept
//!   as untyped JSON values so unknown shapes pass through unchanged
//! - Encoding failures are internal errors, never validation failures

pub mod codec;
pub mod model;
pub mod normalize;

pub use codec::{decode, encode, CodecError};
pub use model::{Action, ConfigurationDocument, Dashboard, Entity};
pub use normalize::normalize;
