use std::cmp::Ordering;
use std::path::Path;

use axum::extract::{Query, State};
use axum::Json;
use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use serde::Serialize;

use common::classify::{image_mime, is_text_name, video_mime};
use common::sandbox::Sandbox;

use super::PathQuery;
use crate::auth::Identity;
use crate::http::ApiError;
use crate::ServiceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
    Other,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: u64,
    pub is_text: bool,
    pub is_image: bool,
    pub is_video: bool,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub root: String,
    pub path: String,
    pub parent: Option<String>,
    pub items: Vec<DirectoryEntry>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    _identity: Identity,
    Query(req): Query<PathQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let dir = state.sandbox().resolve(&req.path)?;
    let meta = tokio::fs::metadata(&dir).await?;
    if !meta.is_dir() {
        return Err(ApiError::NotADirectory);
    }

    let mut items = Vec::new();
    let mut entries = tokio::fs::read_dir(&dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if let Some(item) = inspect_entry(state.sandbox(), entry.path().as_path()).await {
            items.push(item);
        }
    }
    sort_entries(&mut items);

    let parent = if dir == state.sandbox().root() {
        None
    } else {
        dir.parent().map(|p| state.sandbox().relative(p))
    };

    Ok(Json(ListResponse {
        root: "/".to_string(),
        path: state.sandbox().relative(&dir),
        parent,
        items,
    }))
}

/// Stat one child, classify it, and decide whether it may be shown.
///
/// Follows the symlink for the type; falls back to the non-following stat
/// for broken links; entries that cannot be stat'ed at all, or whose
/// canonical target escapes the root, are silently omitted.
async fn inspect_entry(sandbox: &Sandbox, abs: &Path) -> Option<DirectoryEntry> {
    let name = abs.file_name()?.to_str()?.to_string();

    let meta = match tokio::fs::metadata(abs).await {
        Ok(meta) => meta,
        Err(_) => tokio::fs::symlink_metadata(abs).await.ok()?,
    };

    if let Ok(canonical) = tokio::fs::canonicalize(abs).await {
        if !sandbox.contains_canonical(&canonical) {
            return None;
        }
    }

    let kind = if meta.is_dir() {
        EntryKind::Dir
    } else if meta.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };
    let is_file = kind == EntryKind::File;

    Some(DirectoryEntry {
        path: sandbox.relative(abs),
        kind,
        size: meta.len(),
        is_text: is_file && is_text_name(&name),
        is_image: is_file && image_mime(&name).is_some(),
        is_video: is_file && video_mime(&name).is_some(),
        name,
    })
}

/// Directories first, then locale-aware name order within each group.
///
/// Uses the ICU `zh` collation so Chinese file names sort by pinyin
/// rather than code point; if collator construction ever fails we fall
/// back to plain lexicographic order instead of failing the listing.
fn sort_entries(items: &mut [DirectoryEntry]) {
    let collator = Collator::try_new(&locale!("zh").into(), CollatorOptions::new()).ok();

    items.sort_by(|a, b| {
        let rank = |kind: EntryKind| if kind == EntryKind::Dir { 0 } else { 1 };
        match rank(a.kind).cmp(&rank(b.kind)) {
            Ordering::Equal => match &collator {
                Some(collator) => collator.compare(&a.name, &b.name),
                None => a.name.cmp(&b.name),
            },
            order => order,
        }
    });
}
