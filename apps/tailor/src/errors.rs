use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Faults that end a request with an error status instead of a notice.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Page rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::NotFound(path) => {
                tracing::warn!("404 Not Found: {path}");
                (StatusCode::NOT_FOUND, "404 Not Found").into_response()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                internal_error()
            }
            AppError::Render(e) => {
                tracing::error!("Template rendering failed: {e}");
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 Internal Server Error",
    )
        .into_response()
}
