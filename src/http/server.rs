//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (request ID, tracing, metrics, timeout, CORS)
//! - Serve HTTP/1.1 and HTTP/2 connections from a listener
//! - Drain in-flight connections on shutdown within a deadline

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{middleware, Router};
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::http::assets::{serve_static, StaticAssets};
use crate::http::handlers;
use crate::http::middleware::observe_request;
use crate::http::request::MakeRequestUuidV4;
use crate::observability::tracing::RequestSpan;
use crate::observability::Metrics;

/// Upper bound on buffered request head bytes per connection.
const MAX_HEADER_BUFFER: usize = 1024 * 1024;

/// Errors from the serve loop.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connections still open after shutdown grace period of {0:?}")]
    ShutdownTimeout(Duration),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub metrics: Metrics,
    pub assets: Option<StaticAssets>,
    pub started_at: Instant,
}

/// HTTP server for the conversion API and the static UI.
pub struct HttpServer {
    router: Router,
    config: Arc<ServiceConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig, metrics: Metrics, assets: Option<StaticAssets>) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            metrics,
            assets,
            started_at: Instant::now(),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let api = Router::new()
            .route(
                "/api/import",
                post(handlers::import_config).options(handlers::preflight),
            )
            .route(
                "/api/export",
                post(handlers::export_config).options(handlers::preflight),
            )
            .route("/api/health", get(handlers::health))
            .route("/api/init", get(handlers::init))
            .route_layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
            .route_layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET, POST, OPTIONS"),
            ))
            .route_layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type"),
            ));

        let timeout = state.config.timeouts.write;
        let metrics = state.metrics.clone();

        api.route("/metrics", get(handlers::render_metrics))
            .fallback(serve_static)
            .with_state(state)
            .layer(TimeoutLayer::new(timeout))
            .layer(middleware::from_fn_with_state(metrics, observe_request))
            .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain open connections.
    ///
    /// Returns [`ServeError::ShutdownTimeout`] when connections are still
    /// open after the configured shutdown timeout.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServeError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut builder = auto::Builder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(self.config.timeouts.idle)
            .max_buf_size(MAX_HEADER_BUFFER);

        let graceful = GracefulShutdown::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(err) => {
                            tracing::warn!(error = %err, "Failed to accept connection");
                            continue;
                        }
                    };

                    let service = TowerToHyperService::new(self.router.clone());
                    let connection = builder
                        .serve_connection_with_upgrades(TokioIo::new(stream), service)
                        .into_owned();
                    let connection = graceful.watch(connection);

                    tokio::spawn(async move {
                        if let Err(err) = connection.await {
                            tracing::debug!(peer = %peer, error = %err, "Connection closed with error");
                        }
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, draining connections");
                    break;
                }
            }
        }

        drop(listener);

        let grace = self.config.timeouts.shutdown;
        match tokio::time::timeout(grace, graceful.shutdown()).await {
            Ok(()) => {
                tracing::info!("HTTP server stopped");
                Ok(())
            }
            Err(_) => Err(ServeError::ShutdownTimeout(grace)),
        }
    }
}
