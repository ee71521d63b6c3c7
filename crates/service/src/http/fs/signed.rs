//! Token-gated delivery routes.
//!
//! These are the only file routes that skip session authentication; the
//! capability token is the whole grant. The path inside the token is
//! re-resolved through the sandbox on every redemption, so a token minted
//! against one root cannot reach outside a later one.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::Deserialize;

use common::capability::DeliveryMode;

use super::{download, preview, stream};
use crate::http::ApiError;
use crate::ServiceState;

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub token: String,
    pub bom: Option<String>,
}

pub async fn download_handler(
    State(state): State<ServiceState>,
    Query(req): Query<TokenQuery>,
) -> Result<Response, ApiError> {
    let claims = state
        .capabilities()
        .verify(&req.token, DeliveryMode::Download)?;
    download::deliver(
        &state,
        &claims.path,
        download::bom_requested(req.bom.as_deref()),
    )
    .await
}

pub async fn preview_handler(
    State(state): State<ServiceState>,
    Query(req): Query<TokenQuery>,
) -> Result<Response, ApiError> {
    let claims = state
        .capabilities()
        .verify(&req.token, DeliveryMode::Preview)?;
    preview::deliver(&state, &claims.path).await
}

pub async fn stream_handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Query(req): Query<TokenQuery>,
) -> Result<Response, ApiError> {
    let claims = state
        .capabilities()
        .verify(&req.token, DeliveryMode::Stream)?;
    stream::deliver(&state, &claims.path, &headers).await
}
