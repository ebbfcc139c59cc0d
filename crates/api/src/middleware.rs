//! Access guard: the first stage of every protected route.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use househunter_auth::{Identity, TokenService};

use crate::app::errors::ApiError;
use crate::context::IdentityContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
}

/// Require a valid bearer token, then expose the caller as [`IdentityContext`].
///
/// A missing header, an unreadable header or a token that fails
/// verification all end the request with 401; the handler never runs.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers()).inspect_err(|_| {
        tracing::debug!(path = %req.uri().path(), "rejected request without usable authorization header");
    })?;

    let verified = state.tokens.verify(token, Utc::now())?;

    req.extensions_mut()
        .insert(IdentityContext::new(Identity::from(verified)));

    Ok(next.run(req).await)
}

/// The token is the second whitespace-separated word of the header
/// (`Bearer <token>`). The scheme word itself is not checked.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers.get(AUTHORIZATION).ok_or(ApiError::Unauthorized)?;
    let header = header.to_str().map_err(|_| ApiError::Unauthorized)?;

    header
        .split_whitespace()
        .nth(1)
        .ok_or(ApiError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn takes_second_word() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(extract_bearer(&headers("bearer   abc")).unwrap(), "abc");
        assert_eq!(extract_bearer(&headers("Token abc extra")).unwrap(), "abc");
    }

    #[test]
    fn missing_or_single_word_is_unauthorized() {
        assert!(matches!(extract_bearer(&HeaderMap::new()), Err(ApiError::Unauthorized)));
        assert!(matches!(extract_bearer(&headers("abc")), Err(ApiError::Unauthorized)));
        assert!(matches!(extract_bearer(&headers("Bearer ")), Err(ApiError::Unauthorized)));
    }
}
