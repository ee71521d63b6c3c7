//! End-to-end tests for the filesystem routes, driven through the full
//! router with real files under a throwaway root.

mod support;

use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use http::{header, Request, StatusCode};
use serde_json::json;

use common::capability::{CapabilityKey, DeliveryMode};
use support::{app, get, get_anon, post_json, send};

#[tokio::test]
async fn list_requires_a_session() {
    let app = app(&[("notes.txt", b"hi")]);
    let response = get_anon(&app, "/api/fs/list").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_root_puts_directories_first() {
    let app = app(&[("b.txt", b"b"), ("docs/readme.md", b"# hi")]);

    let response = get(&app, "/api/fs/list").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["root"], "/");
    assert_eq!(body["path"], "");
    assert!(body["parent"].is_null());

    let names: Vec<_> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["docs", "b.txt"]);
}

#[tokio::test]
async fn list_subdirectory_reports_its_parent() {
    let app = app(&[("docs/guides/setup.md", b"x")]);

    let response = get(&app, "/api/fs/list?path=docs/guides").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["path"], "docs/guides");
    assert_eq!(body["parent"], "docs");
}

#[tokio::test]
async fn traversal_is_rejected_before_io() {
    let app = app(&[]);
    let response = get(&app, "/api/fs/list?path=../../etc").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = get(&app, "/api/fs/read?path=a/../../escape.txt").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn read_returns_text_content() {
    let app = app(&[("notes.txt", b"hello world")]);

    let response = get(&app, "/api/fs/read?path=notes.txt").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["name"], "notes.txt");
    assert_eq!(body["path"], "notes.txt");
    assert_eq!(body["size"], 11);
    assert_eq!(body["content"], "hello world");
}

#[tokio::test]
async fn read_refuses_binary_content() {
    // unknown extension and a NUL early in the sample
    let app = app(&[("blob.dat", &b"\x00\x01\x02binary"[..])]);
    let response = get(&app, "/api/fs/read?path=blob.dat").await;
    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn read_refuses_oversized_files() {
    let big = vec![b'a'; 2 * 1024 * 1024 + 1];
    let app = app(&[("big.log", big.as_slice())]);
    let response = get(&app, "/api/fs/read?path=big.log").await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn stat_reports_classification() {
    let app = app(&[("movie.mp4", b"not really a movie")]);

    let response = get(&app, "/api/fs/stat?path=movie.mp4").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["type"], "file");
    assert_eq!(body["isVideo"], true);
    assert_eq!(body["isText"], false);
    assert_eq!(body["isImage"], false);
    assert_eq!(body["size"], 18);

    let response = get(&app, "/api/fs/stat?path=missing.mp4").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn hash_streams_an_md5_digest() {
    let app = app(&[("abc.bin", b"abc")]);

    let response = get(&app, "/api/fs/hash?path=abc.bin").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["algo"], "md5");
    assert_eq!(body["value"], "900150983cd24fb0d6963f7d28e17f72");
    assert_eq!(body["size"], 3);

    let response = get(&app, "/api/fs/hash?path=abc.bin&algo=sha1").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn download_is_an_attachment() {
    let app = app(&[("report.pdf", b"%PDF-fake")]);

    let response = get(&app, "/api/fs/download?path=report.pdf").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "attachment; filename=\"report.pdf\""
    );
    assert_eq!(response.header(header::CACHE_CONTROL), "no-store");
    assert_eq!(&response.body[..], b"%PDF-fake");
}

#[tokio::test]
async fn download_with_bom_prefixes_text() {
    let app = app(&[("table.csv", b"a,b\n1,2\n")]);

    let response = get(&app, "/api/fs/download?path=table.csv&bom=1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header(header::CONTENT_TYPE),
        "text/plain; charset=utf-8"
    );
    assert_eq!(&response.body[..], b"\xEF\xBB\xBFa,b\n1,2\n");
}

#[tokio::test]
async fn preview_serves_images_inline_only() {
    let app = app(&[("pix.png", b"\x89PNG fake"), ("notes.txt", b"text")]);

    let response = get(&app, "/api/fs/preview?path=pix.png").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "image/png");
    assert_eq!(response.header(header::CONTENT_DISPOSITION), "inline");

    let response = get(&app, "/api/fs/preview?path=notes.txt").await;
    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

fn media_fixture() -> Vec<u8> {
    (0..1000u32).map(|i| (i % 251) as u8).collect()
}

async fn get_with_range(
    app: &support::TestApp,
    uri: &str,
    range: &str,
) -> support::TestResponse {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, &app.bearer)
        .header(header::RANGE, range)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn stream_without_range_sends_everything() {
    let media = media_fixture();
    let app = app(&[("clip.mp4", media.as_slice())]);

    let response = get(&app, "/api/fs/stream?path=clip.mp4").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header(header::ACCEPT_RANGES), "bytes");
    assert_eq!(response.header(header::CONTENT_TYPE), "video/mp4");
    assert_eq!(response.body.len(), 1000);
}

#[tokio::test]
async fn stream_serves_exactly_the_requested_window() {
    let media = media_fixture();
    let app = app(&[("clip.mp4", media.as_slice())]);

    let response = get_with_range(&app, "/api/fs/stream?path=clip.mp4", "bytes=200-299").await;
    assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.header(header::CONTENT_RANGE), "bytes 200-299/1000");
    assert_eq!(response.header(header::CONTENT_LENGTH), "100");
    assert_eq!(&response.body[..], &media[200..300]);
}

#[tokio::test]
async fn stream_clamps_ranges_past_the_end() {
    let media = media_fixture();
    let app = app(&[("clip.mp4", media.as_slice())]);

    let response = get_with_range(&app, "/api/fs/stream?path=clip.mp4", "bytes=995-2000").await;
    assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.header(header::CONTENT_RANGE), "bytes 995-999/1000");
    assert_eq!(&response.body[..], &media[995..]);
}

#[tokio::test]
async fn stream_rejects_unsatisfiable_ranges() {
    let media = media_fixture();
    let app = app(&[("clip.mp4", media.as_slice())]);

    let response = get_with_range(&app, "/api/fs/stream?path=clip.mp4", "bytes=2000-3000").await;
    assert_eq!(response.status, StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(response.header(header::CONTENT_RANGE), "bytes */1000");
}

#[tokio::test]
async fn signed_url_streams_without_a_session() {
    let media = media_fixture();
    let app = app(&[("clip.mp4", media.as_slice())]);

    let response = post_json(
        &app,
        "/api/fs/sign",
        json!({ "path": "clip.mp4", "mode": "stream", "ttl": 60 }),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/api/fs/stream-signed?token="));
    assert!(body["expiresAt"].as_u64().unwrap() > 0);

    // redeemed anonymously
    let response = get_anon(&app, &url).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.len(), 1000);
}

#[tokio::test]
async fn sign_refuses_paths_that_do_not_exist() {
    let app = app(&[]);
    let response = post_json(&app, "/api/fs/sign", json!({ "path": "ghost.mp4" })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_token_does_not_authorize_streaming() {
    let app = app(&[("clip.mp4", b"0123456789")]);

    let response = post_json(
        &app,
        "/api/fs/sign",
        json!({ "path": "clip.mp4", "mode": "download" }),
    )
    .await;
    let url = response.json()["url"].as_str().unwrap().to_string();
    let token = url.split("token=").nth(1).unwrap().to_string();

    let response = get_anon(&app, &format!("/api/fs/stream-signed?token={token}")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = app(&[("clip.mp4", b"0123456789")]);

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let key = CapabilityKey::from_secret(support::SECRET.as_bytes());
    let (token, _) = key
        .issue_at(now - 11, "clip.mp4", DeliveryMode::Download, "1", 10)
        .unwrap();

    let response = get_anon(&app, &format!("/api/fs/download-signed?token={token}")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = app(&[]);
    let response = get_anon(&app, "/api/fs/download-signed?token=not-a-jwt").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
