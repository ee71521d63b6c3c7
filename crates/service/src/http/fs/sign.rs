use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use common::capability::DeliveryMode;

use super::resolve_regular_file;
use crate::auth::Identity;
use crate::http::ApiError;
use crate::ServiceState;

#[derive(Debug, Deserialize)]
pub struct SignRequest {
    #[serde(default)]
    pub path: String,
    pub ttl: Option<u64>,
    pub mode: Option<DeliveryMode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResponse {
    pub url: String,
    pub expires_at: u64,
}

/// Mint a signed URL for one file.
///
/// Requires a login session; the resulting URL does not. The path is
/// resolved and required to exist up front so a client cannot obtain a
/// token for a path it could not browse to.
pub async fn handler(
    State(state): State<ServiceState>,
    identity: Identity,
    Json(req): Json<SignRequest>,
) -> Result<Json<SignResponse>, ApiError> {
    let (abs, _) = resolve_regular_file(&state, &req.path).await?;
    let relative = state.sandbox().relative(&abs);

    let mode = req.mode.unwrap_or(DeliveryMode::Download);
    let ttl = req.ttl.unwrap_or_else(|| state.default_ttl_secs());

    let (token, expires_at) = state
        .capabilities()
        .issue(&relative, mode, &identity.id, ttl)?;

    Ok(Json(SignResponse {
        url: format!("/api/fs/{}?token={token}", mode.signed_endpoint()),
        expires_at,
    }))
}
