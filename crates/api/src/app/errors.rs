use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use househunter_auth::{AuthzError, TokenError};
use househunter_core::DomainError;
use househunter_infra::StoreError;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized Access";
pub const FORBIDDEN_MESSAGE: &str = "Forbidden Access";

/// Every way a request can fail.
///
/// Authorization failures carry the fixed messages clients match on;
/// storage and signing failures are logged and answered generically.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,
    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid => Self::Unauthorized,
            TokenError::PayloadNotObject => Self::BadRequest(e.to_string()),
            TokenError::Encode(msg) => Self::Internal(msg),
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(e: AuthzError) -> Self {
        match e {
            AuthzError::Forbidden => Self::Forbidden,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "unauthorized", UNAUTHORIZED_MESSAGE),
            Self::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", FORBIDDEN_MESSAGE),
            Self::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Store(e) => {
                tracing::error!(error = %e, "storage failure");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal Server Error")
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal failure");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal Server Error")
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
