use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use common::classify::{is_text_name, sample_is_text};

use super::{file_name, resolve_regular_file, PathQuery};
use crate::auth::Identity;
use crate::http::ApiError;
use crate::ServiceState;

#[derive(Debug, Serialize)]
pub struct ReadResponse {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub content: String,
}

/// Text preview. Name-based eligibility first, content heuristic as a
/// fallback, hard size ceiling either way.
pub async fn handler(
    State(state): State<ServiceState>,
    _identity: Identity,
    Query(req): Query<PathQuery>,
) -> Result<Json<ReadResponse>, ApiError> {
    let (abs, meta) = resolve_regular_file(&state, &req.path).await?;
    let name = file_name(&abs);

    if !is_text_name(&name) && !sample_is_text(&abs).await {
        return Err(ApiError::UnsupportedMediaType);
    }
    if meta.len() > state.max_preview_bytes() {
        return Err(ApiError::PayloadTooLarge { size: meta.len() });
    }

    let bytes = tokio::fs::read(&abs).await?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    Ok(Json(ReadResponse {
        name,
        path: state.sandbox().relative(&abs),
        size: meta.len(),
        content,
    }))
}
