//! Resource access policy stage, run after the access guard.

use axum::{
    extract::{Extension, Path},
    middleware::Next,
    response::Response,
};

use crate::app::errors::ApiError;
use crate::context::IdentityContext;

/// Only let callers through when the `:email` path segment is their own.
///
/// Must be layered inside [`crate::middleware::auth_middleware`], which
/// supplies the identity.
pub async fn require_self(
    Extension(identity): Extension<IdentityContext>,
    Path(email): Path<String>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    househunter_auth::require_self(identity.identity(), &email)?;
    Ok(next.run(req).await)
}
