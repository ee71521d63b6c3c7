use axum::extract::{Query, State};
use axum::Json;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;

use super::resolve_regular_file;
use crate::auth::Identity;
use crate::http::ApiError;
use crate::ServiceState;

const READ_CHUNK_BYTES: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
pub struct HashRequest {
    #[serde(default)]
    pub path: String,
    pub algo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HashResponse {
    pub algo: String,
    pub value: String,
    pub size: u64,
    pub path: String,
}

/// Content digest, streamed. MD5 is the only supported algorithm; the
/// parameter exists so more can be added without changing the wire shape.
pub async fn handler(
    State(state): State<ServiceState>,
    _identity: Identity,
    Query(req): Query<HashRequest>,
) -> Result<Json<HashResponse>, ApiError> {
    let algo = req
        .algo
        .as_deref()
        .unwrap_or("md5")
        .to_ascii_lowercase();
    if algo != "md5" {
        return Err(ApiError::UnsupportedAlgorithm(algo));
    }

    let (abs, meta) = resolve_regular_file(&state, &req.path).await?;

    // never buffer the whole file
    let mut file = tokio::fs::File::open(&abs).await?;
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; READ_CHUNK_BYTES];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(Json(HashResponse {
        algo,
        value: hex::encode(hasher.finalize()),
        size: meta.len(),
        path: state.sandbox().relative(&abs),
    }))
}
