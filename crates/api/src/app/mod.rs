//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage wiring (which gateways back the handlers)
//! - `routes/`: HTTP routes + handlers (one file per collection)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use househunter_auth::TokenService;

use crate::middleware::AuthState;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// Protected routes run the access guard first; the owner lookup adds the
/// self-only policy as a second stage. See `routes/`.
pub fn build_app(tokens: TokenService, services: AppServices) -> Router {
    let tokens = Arc::new(tokens);
    let auth_state = AuthState {
        tokens: tokens.clone(),
    };

    Router::new()
        .route("/", get(routes::system::liveness))
        .route("/health", get(routes::system::health))
        .merge(routes::router(auth_state))
        .layer(Extension(services))
        .layer(Extension(tokens))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
