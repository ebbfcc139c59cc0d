use axum::{Router, routing::post};

use crate::middleware::AuthState;

pub mod houses;
pub mod jwt;
pub mod system;
pub mod users;

/// Router for the collection endpoints and token issuance.
///
/// Each collection router applies the access guard only to the routes that
/// need it.
pub fn router(auth_state: AuthState) -> Router {
    Router::new()
        .route("/jwt", post(jwt::issue_token))
        .nest("/users", users::router(auth_state.clone()))
        .nest("/houses", houses::router(auth_state))
}
