use axum::{
    Extension, Json, Router,
    extract::Path,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
};
use serde_json::Value;

use househunter_auth::RoleFlags;
use househunter_core::{DeleteResult, User, UserDocument, UserId};

use crate::app::{dto, errors::ApiError, services::AppServices};
use crate::authz;
use crate::middleware::{AuthState, auth_middleware};

/// Routes under `/users`.
///
/// Listing and the owner lookup sit behind the access guard; the owner
/// lookup additionally runs the self-only policy between guard and handler.
pub fn router(auth_state: AuthState) -> Router {
    let protected = Router::new()
        .route("/", get(list_users))
        .route(
            "/owner/:email",
            get(role_by_email).route_layer(from_fn(authz::require_self)),
        )
        .route_layer(from_fn_with_state(auth_state, auth_middleware));

    Router::new()
        .route("/", post(create_user))
        .route("/:id", delete(delete_user))
        .merge(protected)
}

/// `GET /users`
pub async fn list_users(
    Extension(services): Extension<AppServices>,
) -> Result<Json<Vec<UserDocument>>, ApiError> {
    Ok(Json(services.users.list_users().await?))
}

/// `GET /users/owner/:email`, reached only when the caller is `:email`.
pub async fn role_by_email(
    Extension(services): Extension<AppServices>,
    Path(email): Path<String>,
) -> Result<Json<RoleFlags>, ApiError> {
    let user = services.users.find_user_by_email(&email).await?;
    Ok(Json(RoleFlags::from_user(user.as_ref())))
}

/// `DELETE /users/:id`
pub async fn delete_user(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let id: UserId = id.parse()?;
    Ok(Json(services.users.delete_user(id).await?))
}

/// `POST /users`: idempotent by email.
pub async fn create_user(
    Extension(services): Extension<AppServices>,
    Json(user): Json<User>,
) -> Result<Json<Value>, ApiError> {
    let outcome = services.users.create_user(user).await?;
    Ok(Json(dto::create_user_outcome_to_json(outcome)))
}
