pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::handlers;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.to_string())
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/tailor", post(handlers::handle_tailor))
        .route("/health", get(health::health_handler))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
