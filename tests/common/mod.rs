//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use config_bridge::config::ServiceConfig;
use config_bridge::http::{HttpServer, ServeError, StaticAssets};
use config_bridge::lifecycle::Shutdown;
use config_bridge::observability::Metrics;

/// Configuration bound to loopback on an ephemeral port, with no static root.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
    config.listener.port = 0;
    config.static_files.root = "/nonexistent/config-bridge-tests".into();
    config
}

pub fn server(config: ServiceConfig) -> HttpServer {
    let assets = StaticAssets::discover(&config.static_files.root).unwrap();
    HttpServer::new(config, Metrics::new().unwrap(), assets)
}

pub fn app(config: ServiceConfig) -> Router {
    server(config).router()
}

pub fn static_app(root: &Path) -> Router {
    let mut config = test_config();
    config.static_files.root = root.to_path_buf();
    app(config)
}

/// A response with its body fully read.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    TestResponse {
        status: parts.status,
        headers: parts.headers,
        body: body.collect().await.unwrap().to_bytes(),
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: impl Into<Body>) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> TestResponse {
    post_raw(app, uri, body.to_string()).await
}

/// A server running on a real socket.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), ServeError>>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn spawn_server(config: ServiceConfig) -> RunningServer {
    let listener = TcpListener::bind(config.listener.socket_addr()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = server(config);

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let handle = tokio::spawn(server.run(listener, receiver));

    RunningServer {
        addr,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
