use std::sync::Arc;

use axum::{Extension, Json};
use chrono::Utc;
use serde_json::Value;

use househunter_auth::TokenService;

use crate::app::dto::TokenResponse;
use crate::app::errors::ApiError;

/// `POST /jwt`: sign whatever identity object the client sends.
pub async fn issue_token(
    Extension(tokens): Extension<Arc<TokenService>>,
    Json(payload): Json<Value>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = tokens.issue(payload, Utc::now())?;
    Ok(Json(TokenResponse { token }))
}
