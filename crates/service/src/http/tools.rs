//! The tools catalog surface.
//!
//! Read-only: the catalog is fixed at startup. Listing works without a
//! session so the landing page can render before login; it only ever
//! exposes active entries either way.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::auth::OptionalIdentity;
use crate::http::ApiError;
use crate::tools::ToolRecord;
use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(list_handler))
        .route("/:id", get(get_handler))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ToolsEnvelope<T> {
    pub success: bool,
    pub data: T,
}

pub async fn list_handler(
    State(state): State<ServiceState>,
    _identity: OptionalIdentity,
) -> Json<ToolsEnvelope<Vec<ToolRecord>>> {
    let data = state.tools().active().into_iter().cloned().collect();
    Json(ToolsEnvelope {
        success: true,
        data,
    })
}

pub async fn get_handler(
    State(state): State<ServiceState>,
    _identity: OptionalIdentity,
    Path(id): Path<String>,
) -> Result<Json<ToolsEnvelope<ToolRecord>>, ApiError> {
    let record = state
        .tools()
        .get(&id)
        .filter(|record| record.active)
        .cloned()
        .ok_or(ApiError::NotFound)?;
    Ok(Json(ToolsEnvelope {
        success: true,
        data: record,
    }))
}
