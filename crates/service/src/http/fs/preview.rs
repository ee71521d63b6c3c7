use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use tokio_util::io::ReaderStream;

use common::classify::image_mime;

use super::{file_name, resolve_regular_file, PathQuery};
use crate::auth::Identity;
use crate::http::ApiError;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    _identity: Identity,
    Query(req): Query<PathQuery>,
) -> Result<Response, ApiError> {
    deliver(&state, &req.path).await
}

/// Inline image delivery. Only recognized image types are served; anything
/// else must go through download instead.
pub(crate) async fn deliver(state: &ServiceState, relative: &str) -> Result<Response, ApiError> {
    let (abs, meta) = resolve_regular_file(state, relative).await?;
    let name = file_name(&abs);
    let mime = image_mime(&name).ok_or(ApiError::UnsupportedMediaType)?;

    let file = tokio::fs::File::open(&abs).await?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime)
        .header(header::CONTENT_LENGTH, meta.len())
        .header(header::CONTENT_DISPOSITION, "inline")
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|err| ApiError::Internal(err.to_string()))
}
