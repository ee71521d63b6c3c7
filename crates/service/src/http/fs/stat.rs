use std::time::SystemTime;

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use common::classify::{image_mime, is_text_name, video_mime};

use super::list::EntryKind;
use super::{file_name, PathQuery};
use crate::auth::Identity;
use crate::http::ApiError;
use crate::ServiceState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatResponse {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: u64,
    pub mtime: Option<String>,
    pub ctime: Option<String>,
    pub is_text: bool,
    pub is_image: bool,
    pub is_video: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    _identity: Identity,
    Query(req): Query<PathQuery>,
) -> Result<Json<StatResponse>, ApiError> {
    let abs = state.sandbox().resolve(&req.path)?;
    let meta = tokio::fs::metadata(&abs).await?;

    let kind = if meta.is_dir() {
        EntryKind::Dir
    } else if meta.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };
    let is_file = kind == EntryKind::File;
    let name = file_name(&abs);

    Ok(Json(StatResponse {
        path: state.sandbox().relative(&abs),
        kind,
        size: meta.len(),
        mtime: meta.modified().ok().and_then(rfc3339),
        ctime: meta.created().ok().and_then(rfc3339),
        is_text: is_file && is_text_name(&name),
        is_image: is_file && image_mime(&name).is_some(),
        is_video: is_file && video_mime(&name).is_some(),
        name,
    }))
}

fn rfc3339(at: SystemTime) -> Option<String> {
    OffsetDateTime::from(at).format(&Rfc3339).ok()
}
