use axum::http::StatusCode;

pub const LIVENESS_MESSAGE: &str = "House Hunter is running";

pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
