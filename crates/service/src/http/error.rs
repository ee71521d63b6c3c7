//! The shared error taxonomy for the request surface.
//!
//! Every handler returns `Result<_, ApiError>`; conversions from the core
//! error types keep the mapping to HTTP status codes in one place.

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::{header, StatusCode};

use common::capability::CapabilityError;
use common::sandbox::SandboxError;

use crate::auth::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("path escapes the sandbox root")]
    OutOfRoot,
    #[error("path does not exist")]
    NotFound,
    #[error("not a directory")]
    NotADirectory,
    #[error("not a regular file")]
    NotAFile,
    #[error("this file type cannot be delivered that way")]
    UnsupportedMediaType,
    #[error("file too large to preview ({size} bytes)")]
    PayloadTooLarge { size: u64 },
    #[error("requested range cannot be satisfied")]
    RangeNotSatisfiable { total: u64 },
    #[error("token is invalid or expired")]
    InvalidOrExpiredToken,
    #[error("token does not authorize this operation")]
    MalformedToken,
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("credential is invalid or expired")]
    Forbidden,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::OutOfRoot
            | ApiError::NotADirectory
            | ApiError::NotAFile
            | ApiError::MalformedToken
            | ApiError::UnsupportedAlgorithm(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            ApiError::InvalidOrExpiredToken | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // never leak internal detail to the client
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(serde_json::json!({ "error": message }));

        match self {
            // 416 carries the unsatisfied-range form of Content-Range
            ApiError::RangeNotSatisfiable { total } => (
                status,
                [(header::CONTENT_RANGE, format!("bytes */{}", total))],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}

impl From<SandboxError> for ApiError {
    fn from(err: SandboxError) -> Self {
        match err {
            SandboxError::OutOfRoot(_) => ApiError::OutOfRoot,
            SandboxError::RootUnavailable(path) => {
                ApiError::Internal(format!("sandbox root unavailable: {}", path.display()))
            }
        }
    }
}

impl From<CapabilityError> for ApiError {
    fn from(err: CapabilityError) -> Self {
        match err {
            CapabilityError::InvalidOrExpired => ApiError::InvalidOrExpiredToken,
            CapabilityError::Malformed => ApiError::MalformedToken,
            CapabilityError::Signing(e) => ApiError::Internal(format!("token signing: {}", e)),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential => ApiError::Unauthorized,
            AuthError::InvalidCredential => ApiError::Forbidden,
        }
    }
}

/// ENOENT-class failures become NotFound, everything else is internal.
impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ApiError::NotFound,
            _ => ApiError::Internal(err.to_string()),
        }
    }
}
