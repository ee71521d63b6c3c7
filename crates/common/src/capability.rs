//! Short-lived signed capability tokens.
//!
//! A capability grants one delivery operation on one confined path without
//! a login session, so that clients which cannot send custom headers (for
//! example a `<video>` tag) can still fetch media. Tokens are HS256 JWTs,
//! self-expiring and never stored server-side.
//!
//! Note on file identity: the token binds a path, not content. A file
//! replaced between issuance and redemption is served as-is; binding a
//! digest into the token would make issuance cost a full file read.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Shortest accepted token lifetime, in seconds.
pub const MIN_TTL_SECS: u64 = 10;
/// Longest accepted token lifetime, in seconds.
pub const MAX_TTL_SECS: u64 = 3600;

/// Subject tag carried by download and preview tokens.
const SUBJECT_DELIVERY: &str = "fsdl";
/// Subject tag carried by stream tokens.
const SUBJECT_STREAM: &str = "fsst";

/// The delivery operation a capability authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Download,
    Preview,
    Stream,
}

impl DeliveryMode {
    /// The token subject tag for this mode. Streaming gets its own tag;
    /// download and preview share one.
    pub fn subject(self) -> &'static str {
        match self {
            DeliveryMode::Download | DeliveryMode::Preview => SUBJECT_DELIVERY,
            DeliveryMode::Stream => SUBJECT_STREAM,
        }
    }

    /// The unauthenticated endpoint the signed URL should point at.
    pub fn signed_endpoint(self) -> &'static str {
        match self {
            DeliveryMode::Download => "download-signed",
            DeliveryMode::Preview => "preview-signed",
            DeliveryMode::Stream => "stream-signed",
        }
    }
}

/// Claims carried by a capability token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityClaims {
    /// Subject tag, see [`DeliveryMode::subject`].
    pub sub: String,
    /// Root-relative path the capability grants access to.
    pub path: String,
    /// Identity of the issuer (the authenticated user who signed the URL).
    pub uid: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: u64,
}

/// Key material for issuing and verifying capability tokens.
pub struct CapabilityKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl CapabilityKey {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Mint a capability for `path` with the given mode and lifetime.
    ///
    /// The ttl is silently clamped into `[MIN_TTL_SECS, MAX_TTL_SECS]`.
    /// Returns the encoded token and the expiry in epoch milliseconds.
    pub fn issue(
        &self,
        path: &str,
        mode: DeliveryMode,
        uid: &str,
        ttl_secs: u64,
    ) -> Result<(String, u64), CapabilityError> {
        self.issue_at(unix_now(), path, mode, uid, ttl_secs)
    }

    /// Issuance pinned to an explicit clock. Exists so expiry behavior can
    /// be exercised without waiting on wall time.
    pub fn issue_at(
        &self,
        now_secs: u64,
        path: &str,
        mode: DeliveryMode,
        uid: &str,
        ttl_secs: u64,
    ) -> Result<(String, u64), CapabilityError> {
        let ttl = ttl_secs.clamp(MIN_TTL_SECS, MAX_TTL_SECS);
        let exp = now_secs + ttl;
        let claims = CapabilityClaims {
            sub: mode.subject().to_string(),
            path: path.to_string(),
            uid: uid.to_string(),
            exp,
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(CapabilityError::Signing)?;
        Ok((token, exp * 1000))
    }

    /// Decode and validate a token for the endpoint's expected mode.
    ///
    /// Signature and expiry failures map to `InvalidOrExpired`; a valid
    /// token whose subject tag does not match the expected mode is
    /// `Malformed` (a download token must not authorize streaming).
    pub fn verify(
        &self,
        token: &str,
        expected: DeliveryMode,
    ) -> Result<CapabilityClaims, CapabilityError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = jsonwebtoken::decode::<CapabilityClaims>(token, &self.decoding, &validation)
            .map_err(|_| CapabilityError::InvalidOrExpired)?;

        let claims = data.claims;
        if claims.sub != expected.subject() || claims.path.is_empty() {
            return Err(CapabilityError::Malformed);
        }
        Ok(claims)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("token is invalid or expired")]
    InvalidOrExpired,
    #[error("token does not authorize this operation")]
    Malformed,
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}
