//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper-util connection builder, router, layers)
//!     → request.rs (request ID, inbound envelopes)
//!     → middleware/ (metrics, in-flight tracking)
//!     → handlers.rs (import / export / health / init / metrics)
//!       or assets.rs (static bundle, SPA fallback)
//!     → response.rs (envelopes, error mapping)
//!     → Send to client
//! ```

pub mod assets;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use assets::StaticAssets;
pub use request::{RequestId, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer, ServeError};
