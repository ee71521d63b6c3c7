//! The sandboxed filesystem request surface.
//!
//! One module per operation; every operation re-resolves its path through
//! the sandbox, including the token-gated `-signed` variants.

use std::path::{Path, PathBuf};

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

pub mod download;
pub mod hash;
pub mod list;
pub mod preview;
pub mod range;
pub mod read;
pub mod sign;
pub mod signed;
pub mod stat;
pub mod stream;

use crate::http::ApiError;
use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/list", get(list::handler))
        .route("/read", get(read::handler))
        .route("/stat", get(stat::handler))
        .route("/hash", get(hash::handler))
        .route("/download", get(download::handler))
        .route("/preview", get(preview::handler))
        .route("/stream", get(stream::handler))
        .route("/sign", post(sign::handler))
        .route("/download-signed", get(signed::download_handler))
        .route("/preview-signed", get(signed::preview_handler))
        .route("/stream-signed", get(signed::stream_handler))
        .with_state(state)
}

/// Query shape shared by the single-path GET operations.
#[derive(Debug, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    pub path: String,
}

/// Resolve a relative path and require it to be an existing regular file.
pub(crate) async fn resolve_regular_file(
    state: &ServiceState,
    relative: &str,
) -> Result<(PathBuf, std::fs::Metadata), ApiError> {
    let abs = state.sandbox().resolve(relative)?;
    let meta = tokio::fs::metadata(&abs).await?;
    if !meta.is_file() {
        return Err(ApiError::NotAFile);
    }
    Ok((abs, meta))
}

pub(crate) fn file_name(abs: &Path) -> String {
    abs.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string()
}
