//! The server on a real socket: endpoints, HTTP clients and shutdown.

use std::time::Duration;

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_health_and_init_over_tcp() {
    let server = common::spawn_server(common::test_config()).await;
    let client = common::client();

    let res = client.get(server.url("/api/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let health: Value = res.json().await.unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
    assert!(health["uptime"].as_str().unwrap().ends_with('s'));

    let init: Value = client
        .get(server.url("/api/init"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(init["version"], env!("CARGO_PKG_VERSION"));
    assert!(init["commit"].is_string());
    assert!(init["date"].is_string());

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_import_over_tcp() {
    let server = common::spawn_server(common::test_config()).await;

    let res = common::client()
        .post(server.url("/api/import"))
        .json(&json!({ "config": "logLevel: WARN\n" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["config"]["logLevel"], "WARN");

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_metrics_scrape_over_tcp() {
    let server = common::spawn_server(common::test_config()).await;
    let client = common::client();

    client.get(server.url("/api/health")).send().await.unwrap();
    let text = client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(text.contains("http_requests_total"), "{text}");
    assert!(text.contains("http_request_duration_seconds"), "{text}");
    assert!(text.contains("http_requests_in_flight"), "{text}");

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let server = common::spawn_server(common::test_config()).await;
    let addr = server.addr;

    server.shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();

    assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_shutdown_times_out_with_open_connection() {
    let mut config = common::test_config();
    config.timeouts.shutdown = Duration::from_millis(200);
    config.timeouts.idle = Duration::from_secs(30);
    let server = common::spawn_server(config).await;

    // Opens a connection and sends half a request head, so it never becomes idle.
    let mut stream = tokio::net::TcpStream::connect(server.addr).await.unwrap();
    tokio::io::AsyncWriteExt::write_all(&mut stream, b"GET /api/health HTTP/1.1\r\nHost: x\r\n")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    server.shutdown.trigger();
    let result = server.handle.await.unwrap();
    assert!(matches!(
        result,
        Err(config_bridge::http::ServeError::ShutdownTimeout(_))
    ));
}
