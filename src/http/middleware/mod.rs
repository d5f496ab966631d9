//! Request middleware.
//!
//! Layer order, outermost first:
//! ```text
//! SetRequestId → PropagateRequestId → Trace → observe_request → Timeout → handler
//! ```
//! `observe_request` sits outside the timeout so requests cut off by the
//! write deadline are still counted with their 408 status.

pub mod observe;

pub use observe::observe_request;
