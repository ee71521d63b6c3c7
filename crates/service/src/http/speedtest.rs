//! LAN throughput measurement.
//!
//! Download pushes generated bytes at the client; upload drains whatever
//! the client sends until a deadline and reports the achieved rate. Both
//! directions work on synthetic data, nothing touches the filesystem.

use std::convert::Infallible;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::http::ApiError;
use crate::ServiceState;

const CHUNK_BYTES: usize = 64 * 1024;
const DEFAULT_DOWNLOAD_BYTES: u64 = 1024 * 1024;
const MAX_DOWNLOAD_BYTES: u64 = 256 * 1024 * 1024;
const DEFAULT_UPLOAD_MILLIS: u64 = 5_000;
const MAX_UPLOAD_MILLIS: u64 = 30_000;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/download", get(download_handler))
        .route("/upload", post(upload_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub size: Option<u64>,
}

/// Stream `size` bytes of filler at the client.
pub async fn download_handler(
    State(_state): State<ServiceState>,
    Query(req): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let size = req
        .size
        .unwrap_or(DEFAULT_DOWNLOAD_BYTES)
        .min(MAX_DOWNLOAD_BYTES);

    let full_chunks = size / CHUNK_BYTES as u64;
    let tail = (size % CHUNK_BYTES as u64) as usize;

    let chunk = Bytes::from(vec![b'A'; CHUNK_BYTES]);
    let stream = futures::stream::iter(0..full_chunks)
        .map({
            let chunk = chunk.clone();
            move |_| Ok::<_, Infallible>(chunk.clone())
        })
        .chain(futures::stream::iter(
            (tail > 0).then(|| Ok(chunk.slice(..tail))),
        ));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, size)
        .header(header::CACHE_CONTROL, "no-store, no-cache")
        .body(Body::from_stream(stream))
        .map_err(|err| ApiError::Internal(err.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub duration: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub success: bool,
    pub received_bytes: u64,
    pub duration_ms: u64,
    pub speed_bps: f64,
    pub speed_mbps: f64,
}

/// Drain the request body until it ends or the deadline fires, whichever
/// comes first, and report the measured rate.
pub async fn upload_handler(
    State(_state): State<ServiceState>,
    Query(req): Query<UploadQuery>,
    body: Body,
) -> Result<Json<UploadReport>, ApiError> {
    let budget = req
        .duration
        .unwrap_or(DEFAULT_UPLOAD_MILLIS)
        .min(MAX_UPLOAD_MILLIS);

    let mut stream = body.into_data_stream();
    let started = Instant::now();
    let deadline = tokio::time::sleep(Duration::from_millis(budget));
    tokio::pin!(deadline);

    let mut received: u64 = 0;
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            frame = stream.next() => match frame {
                Some(Ok(bytes)) => received += bytes.len() as u64,
                Some(Err(_)) | None => break,
            },
        }
    }

    let elapsed = started.elapsed();
    let duration_ms = elapsed.as_millis().max(1) as u64;
    let speed_bps = received as f64 / (duration_ms as f64 / 1000.0);

    Ok(Json(UploadReport {
        success: true,
        received_bytes: received,
        duration_ms,
        speed_bps,
        speed_mbps: (speed_bps * 8.0) / (1024.0 * 1024.0),
    }))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub timestamp: String,
}

pub async fn status_handler() -> Json<StatusResponse> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(StatusResponse {
        status: "ready",
        timestamp,
    })
}
