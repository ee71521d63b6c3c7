use std::io::SeekFrom;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use common::classify::{image_mime, video_mime};

use super::range::{self, ByteRange};
use super::{file_name, resolve_regular_file, PathQuery};
use crate::auth::Identity;
use crate::http::ApiError;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    _identity: Identity,
    headers: HeaderMap,
    Query(req): Query<PathQuery>,
) -> Result<Response, ApiError> {
    deliver(&state, &req.path, &headers).await
}

/// Range-aware media delivery.
///
/// Without a `Range` header the whole file goes out as 200. With one we
/// serve exactly the requested window as 206, seeking rather than reading
/// from the start, so video players can jump around large files.
pub(crate) async fn deliver(
    state: &ServiceState,
    relative: &str,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let (abs, meta) = resolve_regular_file(state, relative).await?;
    let size = meta.len();
    let name = file_name(&abs);

    let mime = video_mime(&name)
        .or_else(|| image_mime(&name))
        .map(str::to_string)
        .unwrap_or_else(|| mime_guess::from_path(&abs).first_or_octet_stream().to_string());

    let range = match headers.get(header::RANGE) {
        None => None,
        Some(value) => {
            let value = value
                .to_str()
                .map_err(|_| ApiError::RangeNotSatisfiable { total: size })?;
            Some(
                range::parse(value, size)
                    .map_err(|_| ApiError::RangeNotSatisfiable { total: size })?,
            )
        }
    };

    let mut file = tokio::fs::File::open(&abs).await?;
    let builder = Response::builder()
        .header(header::CONTENT_TYPE, &mime)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, "no-store");

    let response = match range {
        None => builder
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, size)
            .body(Body::from_stream(ReaderStream::new(file))),
        Some(ByteRange { start, end }) => {
            file.seek(SeekFrom::Start(start)).await?;
            let len = end - start + 1;
            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {start}-{end}/{size}"),
                )
                .header(header::CONTENT_LENGTH, len)
                .body(Body::from_stream(ReaderStream::new(file.take(len))))
        }
    };

    response.map_err(|err| ApiError::Internal(err.to_string()))
}
