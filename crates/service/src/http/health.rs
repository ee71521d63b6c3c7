//! Liveness and readiness probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .route("/version", get(version_handler))
        .with_state(state)
}

pub async fn healthz_handler() -> &'static str {
    "ok"
}

/// Ready only while the sandbox root is still a directory; an unmounted
/// disk flips this to 503 without killing the process.
pub async fn readyz_handler(State(state): State<ServiceState>) -> (StatusCode, &'static str) {
    match tokio::fs::metadata(state.sandbox().root()).await {
        Ok(meta) if meta.is_dir() => (StatusCode::OK, "ready"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "sandbox root unavailable"),
    }
}

pub async fn version_handler() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
