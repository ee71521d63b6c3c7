//! Identity verification, consumed as an opaque capability.
//!
//! The service never issues login sessions itself; it only needs a way to
//! turn a bearer credential into a stable identity. That capability is the
//! [`IdentityVerifier`] trait, injected into state as a trait object. The
//! shipped implementation verifies HS256 session tokens and can also issue
//! them, which is what an external login service (and the tests) use.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::async_trait;
use axum::extract::FromRequestParts;
use http::header::AUTHORIZATION;
use http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::http::ApiError;
use crate::state::State;

/// A verified user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Turn a bearer credential into an identity, or fail.
    async fn verify(&self, credential: &str) -> Result<Identity, AuthError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    name: String,
    exp: u64,
}

/// HS256 session verifier (and issuer, for callers that need one).
pub struct JwtIdentityVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtIdentityVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a session token for `identity`, valid for `ttl_secs`.
    pub fn issue(&self, identity: &Identity, ttl_secs: u64) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let claims = SessionClaims {
            sub: identity.id.clone(),
            name: identity.name.clone(),
            exp: now + ttl_secs,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| AuthError::InvalidCredential)
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<Identity, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        let data =
            jsonwebtoken::decode::<SessionClaims>(credential, &self.decoding, &validation)
                .map_err(|_| AuthError::InvalidCredential)?;
        Ok(Identity {
            id: data.claims.sub,
            name: data.claims.name,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authentication required")]
    MissingCredential,
    #[error("credential is invalid or expired")]
    InvalidCredential,
}

fn bearer_credential(parts: &Parts) -> Result<&str, AuthError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingCredential)
}

/// Extractor: handlers that take an `Identity` require authentication.
#[async_trait]
impl FromRequestParts<State> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &State) -> Result<Self, Self::Rejection> {
        let credential = bearer_credential(parts)?;
        let identity = state.verifier().verify(credential).await?;
        Ok(identity)
    }
}

/// Extractor for endpoints that work with or without a session.
pub struct OptionalIdentity(pub Option<Identity>);

#[async_trait]
impl FromRequestParts<State> for OptionalIdentity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &State) -> Result<Self, Self::Rejection> {
        let identity = match bearer_credential(parts) {
            Ok(credential) => state.verifier().verify(credential).await.ok(),
            Err(_) => None,
        };
        Ok(OptionalIdentity(identity))
    }
}
