use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Claims carried by an identity token.
///
/// The caller-supplied payload is flattened next to the two registered
/// time claims, so a token for `{"email": "a@b.c"}` decodes to
/// `{"email": "a@b.c", "iat": ..., "exp": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl TokenClaims {
    /// Claims for `payload`, valid from `issued_at` until `expires_at`.
    ///
    /// Any `iat`/`exp` keys already present in the payload are replaced.
    pub fn new(
        mut payload: Map<String, Value>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        payload.remove("iat");
        payload.remove("exp");
        Self {
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            payload,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the time claims against `now`.
///
/// Signature verification / decoding happens in [`crate::TokenService`].
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now.timestamp() >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
