//! HTTP handlers and routers for the service.

use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{Method, StatusCode};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;

pub mod error;
pub mod fs;
pub mod health;
pub mod speedtest;
pub mod tools;

pub use error::ApiError;

use crate::ServiceState;

const API_PREFIX: &str = "/api";
const STATUS_PREFIX: &str = "/_status";

/// Build the full application router.
pub fn router(state: ServiceState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST])
        .allow_headers(vec![ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN])
        .allow_origin(Any)
        .allow_credentials(false);

    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let api_router = Router::new()
        .nest("/fs", fs::router(state.clone()))
        .nest("/tools", tools::router(state.clone()))
        .nest("/speedtest", speedtest::router(state.clone()));

    Router::new()
        .nest(API_PREFIX, api_router)
        .nest(STATUS_PREFIX, health::router(state.clone()))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(cors_layer)
        .layer(trace_layer)
}

pub async fn not_found_handler() -> Response {
    let body = serde_json::json!({ "error": "not found" });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
