//! End-to-end tests for the tools catalog, speed test and probe routes.

mod support;

use axum::body::Body;
use http::{header, Request, StatusCode};

use support::{app, get_anon, send};

#[tokio::test]
async fn tools_list_works_without_a_session() {
    let app = app(&[]);

    let response = get_anon(&app, "/api/tools").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["success"], true);
    let items = body["data"].as_array().unwrap();
    assert!(!items.is_empty());
    // active entries only, grouped by category then name
    for item in items {
        assert_eq!(item["active"], true);
    }
    let keys: Vec<_> = items
        .iter()
        .map(|item| {
            (
                item["category"].as_str().unwrap().to_string(),
                item["name"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[tokio::test]
async fn unknown_tool_is_a_404() {
    let app = app(&[]);
    let response = get_anon(&app, "/api/tools/no-such-tool").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn speedtest_download_sends_the_requested_size() {
    let app = app(&[]);

    let response = get_anon(&app, "/api/speedtest/download?size=100000").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header(header::CONTENT_TYPE),
        "application/octet-stream"
    );
    assert_eq!(response.header(header::CONTENT_LENGTH), "100000");
    assert_eq!(response.body.len(), 100_000);
}

#[tokio::test]
async fn speedtest_upload_counts_received_bytes() {
    let app = app(&[]);

    let payload = vec![b'x'; 256 * 1024];
    let request = Request::builder()
        .method("POST")
        .uri("/api/speedtest/upload?duration=2000")
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(payload.clone()))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["receivedBytes"].as_u64().unwrap(), payload.len() as u64);
    assert!(body["durationMs"].as_u64().unwrap() >= 1);
    assert!(body["speedBps"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn speedtest_status_reports_ready() {
    let app = app(&[]);
    let response = get_anon(&app, "/api/speedtest/status").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "ready");
}

#[tokio::test]
async fn probes_answer() {
    let app = app(&[]);

    let response = get_anon(&app, "/_status/healthz").await;
    assert_eq!(response.status, StatusCode::OK);

    let response = get_anon(&app, "/_status/readyz").await;
    assert_eq!(response.status, StatusCode::OK);

    let response = get_anon(&app, "/_status/version").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, env!("CARGO_PKG_VERSION").as_bytes());
}

#[tokio::test]
async fn unknown_routes_fall_back_to_json_404() {
    let app = app(&[]);
    let response = get_anon(&app, "/api/nope").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "not found");
}
