//! `POST /api/export` behaviour, CORS and request IDs.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;

mod common;

#[tokio::test]
async fn test_export_document() {
    let app = common::app(common::test_config());
    let document = json!({
        "listenAddressSingleHTTPFrontend": "0.0.0.0:1337",
        "logLevel": "INFO",
        "actions": [
            { "title": "Ping", "shell": "ping -c 1 example.com", "timeout": 5 }
        ],
        "entities": [],
        "dashboards": []
    });

    let res = common::post_json(&app, "/api/export", &json!({ "config": document })).await;
    assert_eq!(res.status, StatusCode::OK);

    let body = res.json();
    assert_eq!(body["success"], true);
    let yaml = body["yaml"].as_str().unwrap();
    assert!(yaml.contains("listenAddressSingleHTTPFrontend:"));
    assert!(yaml.contains("logLevel: INFO"));
    assert!(yaml.contains("title: Ping"));
    assert!(yaml.contains("timeout: 5"));
    assert!(!yaml.contains("entities"), "empty collections dropped:\n{yaml}");
    assert!(!yaml.contains("dashboards"), "empty collections dropped:\n{yaml}");
    assert!(!yaml.contains("hidden"), "default fields omitted:\n{yaml}");
}

#[tokio::test]
async fn test_export_then_import_round_trip() {
    let app = common::app(common::test_config());
    let document = json!({
        "listenAddressSingleHTTPFrontend": "127.0.0.1:8080",
        "logLevel": "DEBUG",
        "actions": [
            {
                "title": "Deploy",
                "shell": "deploy {{ env }}",
                "id": "deploy",
                "timeout": 120,
                "entity": "server",
                "hidden": true,
                "arguments": [{ "name": "env", "choices": [{ "value": "prod" }, { "value": "dev" }] }]
            }
        ],
        "entities": [{ "file": "/etc/servers.yaml", "name": "server" }],
        "dashboards": [{ "title": "Main", "contents": [{ "title": "Deploy" }, "plain"] }]
    });

    let exported = common::post_json(&app, "/api/export", &json!({ "config": document })).await;
    assert_eq!(exported.status, StatusCode::OK);
    let yaml = exported.json()["yaml"].as_str().unwrap().to_string();

    let imported = common::post_json(&app, "/api/import", &json!({ "config": yaml })).await;
    assert_eq!(imported.status, StatusCode::OK);
    assert_eq!(imported.json()["config"], document);
}

#[tokio::test]
async fn test_export_requires_config() {
    let app = common::app(common::test_config());

    for body in [json!({}), json!({ "config": null })] {
        let res = common::post_json(&app, "/api/export", &body).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.json(), json!({ "success": false, "error": "Config is required" }));
    }
}

#[tokio::test]
async fn test_export_malformed_envelope() {
    let app = common::app(common::test_config());
    let res = common::post_raw(&app, "/api/export", "{\"config\": ").await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["success"], false);
}

#[tokio::test]
async fn test_wrong_method_rejected() {
    let app = common::app(common::test_config());

    assert_eq!(common::get(&app, "/api/import").await.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(common::get(&app, "/api/export").await.status, StatusCode::METHOD_NOT_ALLOWED);

    let res = common::post_raw(&app, "/api/health", "").await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_preflight_and_cors_headers() {
    let app = common::app(common::test_config());

    for path in ["/api/import", "/api/export"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let res = common::send(&app, request).await;

        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body.is_empty());
        assert_eq!(res.header("access-control-allow-origin"), Some("*"));
        assert_eq!(res.header("access-control-allow-methods"), Some("GET, POST, OPTIONS"));
        assert_eq!(res.header("access-control-allow-headers"), Some("Content-Type"));
    }

    let res = common::post_json(&app, "/api/export", &json!({})).await;
    assert_eq!(res.header("access-control-allow-origin"), Some("*"));

    let res = common::get(&app, "/api/health").await;
    assert_eq!(res.header("access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn test_request_id_echoed_or_generated() {
    let app = common::app(common::test_config());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/export")
        .header("x-request-id", "client-supplied-42")
        .body(Body::from(r#"{"config": {}}"#))
        .unwrap();
    let res = common::send(&app, request).await;
    assert_eq!(res.header("x-request-id"), Some("client-supplied-42"));

    let first = common::get(&app, "/api/health").await;
    let second = common::get(&app, "/api/health").await;
    let first = first.header("x-request-id").unwrap().to_string();
    let second = second.header("x-request-id").unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&first).is_ok());
    assert_ne!(first, second);

    let error = common::post_raw(&app, "/api/import", "nope").await;
    assert!(error.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_concurrent_exports_are_independent() {
    let app = common::app(common::test_config());

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = json!({ "config": { "logLevel": format!("level-{i}") } });
                let res = common::post_json(&app, "/api/export", &body).await;
                (i, res.status, res.json())
            })
        })
        .collect();

    for task in tasks {
        let (i, status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        let yaml = body["yaml"].as_str().unwrap();
        assert!(yaml.contains(&format!("logLevel: level-{i}\n")), "{yaml}");
    }
}

#[tokio::test]
async fn test_request_metrics_use_route_template() {
    let app = common::app(common::test_config());
    common::post_json(&app, "/api/export", &json!({ "config": {} })).await;
    common::get(&app, "/api/health").await;

    let metrics = common::get(&app, "/metrics").await;
    assert_eq!(metrics.status, StatusCode::OK);
    assert!(metrics.header("content-type").unwrap().starts_with("text/plain"));

    let text = metrics.text();
    assert!(text.contains("http_requests_total"), "{text}");
    assert!(text.contains(r#"endpoint="/api/export""#), "{text}");
    assert!(text.contains(r#"endpoint="/api/health""#), "{text}");
    assert!(text.contains(r#"yaml_parse_total{status="success"} 1"#), "{text}");
}
