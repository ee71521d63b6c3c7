use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use common::classify::is_text_name;

use super::{file_name, resolve_regular_file};
use crate::auth::Identity;
use crate::http::ApiError;
use crate::ServiceState;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub path: String,
    pub bom: Option<String>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    _identity: Identity,
    Query(req): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    deliver(&state, &req.path, bom_requested(req.bom.as_deref())).await
}

pub(crate) fn bom_requested(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}

/// Attachment delivery. Shared by the interactive and token-gated routes.
///
/// With `bom` set on a text file the payload gets a UTF-8 BOM prefix and
/// a fixed text content type, for spreadsheet tools that misdetect CSV
/// encodings; Content-Length is omitted in that case.
pub(crate) async fn deliver(
    state: &ServiceState,
    relative: &str,
    bom: bool,
) -> Result<Response, ApiError> {
    let (abs, meta) = resolve_regular_file(state, relative).await?;
    let name = file_name(&abs);
    let file = tokio::fs::File::open(&abs).await?;

    let disposition = format!("attachment; filename=\"{}\"", name.replace('"', ""));
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CACHE_CONTROL, "no-store");

    let response = if bom && is_text_name(&name) {
        let prefix = futures::stream::once(async {
            Ok::<_, std::io::Error>(Bytes::from_static(&UTF8_BOM))
        });
        builder
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Body::from_stream(prefix.chain(ReaderStream::new(file))))
    } else {
        let mime = mime_guess::from_path(&abs).first_or_octet_stream();
        builder
            .header(header::CONTENT_TYPE, mime.as_ref())
            .header(header::CONTENT_LENGTH, meta.len())
            .body(Body::from_stream(ReaderStream::new(file)))
    };

    response.map_err(|err| ApiError::Internal(err.to_string()))
}
