//! Token Service: HS256 identity tokens signed with a shared secret.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::claims::{TokenClaims, validate_claims};

/// Lifetime of every issued token.
pub const TOKEN_TTL_HOURS: i64 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed token or expired token. Callers are not told which.
    #[error("invalid token")]
    Invalid,

    /// The payload cannot be carried by a token (it must be a JSON object).
    #[error("token payload must be a JSON object")]
    PayloadNotObject,

    #[error("failed to sign token: {0}")]
    Encode(String),
}

/// A token that passed signature and expiry checks.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    /// The payload exactly as it was issued (time claims removed).
    pub payload: Map<String, Value>,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Issues and verifies identity tokens.
///
/// Stateless apart from the keys; cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        // Expiry is checked against an explicit clock in `verify`, and the
        // payload is arbitrary, so audience checks do not apply.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Sign `payload` into a token expiring [`TOKEN_TTL_HOURS`] after `now`.
    ///
    /// Issuance is unconditional: the payload is not checked against any
    /// stored identity.
    pub fn issue(&self, payload: Value, now: DateTime<Utc>) -> Result<String, TokenError> {
        let Value::Object(payload) = payload else {
            return Err(TokenError::PayloadNotObject);
        };

        let claims = TokenClaims::new(payload, now, now + self.ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Check signature and expiry, returning the issued payload.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                TokenError::Invalid
            })?;

        validate_claims(&data.claims, now).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            TokenError::Invalid
        })?;

        Ok(VerifiedToken {
            payload: data.claims.payload,
            issued_at: data.claims.iat,
            expires_at: data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_then_verify_returns_payload() {
        let svc = TokenService::new(SECRET);
        let now = Utc::now();
        let payload = json!({ "email": "a@example.com", "name": "Ayesha" });

        let token = svc.issue(payload.clone(), now).unwrap();
        let verified = svc.verify(&token, now).unwrap();

        assert_eq!(Value::Object(verified.payload), payload);
        assert_eq!(verified.expires_at - verified.issued_at, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn expires_after_ten_hours() {
        let svc = TokenService::new(SECRET);
        let issued = Utc::now();
        let token = svc.issue(json!({ "email": "a@example.com" }), issued).unwrap();

        let almost = issued + Duration::hours(TOKEN_TTL_HOURS) - Duration::seconds(1);
        assert!(svc.verify(&token, almost).is_ok());

        let after = issued + Duration::hours(TOKEN_TTL_HOURS);
        assert_eq!(svc.verify(&token, after), Err(TokenError::Invalid));
    }

    #[test]
    fn rejects_foreign_signature() {
        let now = Utc::now();
        let token = TokenService::new("other-secret")
            .issue(json!({ "email": "a@example.com" }), now)
            .unwrap();

        assert_eq!(TokenService::new(SECRET).verify(&token, now), Err(TokenError::Invalid));
    }

    #[test]
    fn rejects_garbage_and_tampering() {
        let svc = TokenService::new(SECRET);
        let now = Utc::now();
        assert_eq!(svc.verify("not.a.token", now), Err(TokenError::Invalid));
        assert_eq!(svc.verify("", now), Err(TokenError::Invalid));

        let token = svc.issue(json!({ "email": "a@example.com" }), now).unwrap();
        let forged = svc.issue(json!({ "email": "admin@example.com" }), now).unwrap();
        let forged_claims = forged.split('.').nth(1).unwrap();

        // Claims from one token with the signature of another.
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = forged_claims;
        let spliced = parts.join(".");
        assert_eq!(svc.verify(&spliced, now), Err(TokenError::Invalid));
    }

    #[test]
    fn caller_cannot_extend_expiry() {
        let svc = TokenService::new(SECRET);
        let now = Utc::now();
        let far_future = (now + Duration::days(365)).timestamp();
        let token = svc
            .issue(json!({ "email": "a@example.com", "exp": far_future }), now)
            .unwrap();

        let verified = svc.verify(&token, now).unwrap();
        assert_eq!(verified.expires_at, (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp());
        assert!(!verified.payload.contains_key("exp"));
    }

    #[test]
    fn rejects_non_object_payload() {
        let svc = TokenService::new(SECRET);
        assert_eq!(
            svc.issue(json!("a@example.com"), Utc::now()),
            Err(TokenError::PayloadNotObject)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: any string-valued payload survives a round trip.
        #[test]
        fn round_trip_preserves_payload(
            email in "[a-z]{1,12}@[a-z]{1,8}\\.com",
            extra in prop::collection::btree_map("[a-z]{1,8}", "[ -~]{0,20}", 0..5)
        ) {
            let svc = TokenService::new(SECRET);
            let now = Utc::now();

            let mut payload = Map::new();
            for (k, v) in extra {
                payload.insert(k, Value::String(v));
            }
            payload.remove("iat");
            payload.remove("exp");
            payload.insert("email".into(), Value::String(email));

            let token = svc.issue(Value::Object(payload.clone()), now).unwrap();
            let verified = svc.verify(&token, now).unwrap();
            prop_assert_eq!(verified.payload, payload);
        }
    }
}
