//! Shared scaffolding for the end-to-end router tests.

use axum::body::Body;
use axum::Router;
use bytes::Bytes;
use http::{header, HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use service::{Config, Identity, JwtIdentityVerifier, ServiceState};

pub const SECRET: &str = "integration-test-secret";

/// A router over a throwaway root populated with `files`, plus a valid
/// session header for it.
pub struct TestApp {
    pub router: Router,
    pub bearer: String,
    // keeps the root alive for the duration of the test
    pub root: TempDir,
}

pub fn app(files: &[(&str, &[u8])]) -> TestApp {
    let root = tempfile::tempdir().unwrap();
    for (path, contents) in files {
        let abs = root.path().join(path);
        if let Some(parent) = abs.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(abs, contents).unwrap();
    }

    let config = Config {
        root: Some(root.path().to_path_buf()),
        secret: Some(SECRET.to_string()),
        ..Config::default()
    };
    let state = ServiceState::from_config(&config).unwrap();
    let router = service::http::router(state);

    let session = JwtIdentityVerifier::new(SECRET.as_bytes())
        .issue(
            &Identity {
                id: "1".to_string(),
                name: "admin".to_string(),
            },
            60,
        )
        .unwrap();

    TestApp {
        router,
        bearer: format!("Bearer {session}"),
        root,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: header::HeaderName) -> &str {
        self.headers.get(name).unwrap().to_str().unwrap()
    }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> TestResponse {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body,
    }
}

/// GET with the app's session attached.
pub async fn get(app: &TestApp, uri: &str) -> TestResponse {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, &app.bearer)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// GET with no credentials at all.
pub async fn get_anon(app: &TestApp, uri: &str) -> TestResponse {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// Authenticated POST with a JSON body.
pub async fn post_json(app: &TestApp, uri: &str, body: serde_json::Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, &app.bearer)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
