//! Error types and error handling for the application
//!
//! This module defines the error taxonomy for the CRUD API and its conversion
//! to HTTP responses. All errors implement `IntoResponse` so handlers can
//! return `Result<_, AppError>` directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use once_cell::sync::OnceCell;
use serde_json::json;
use thiserror::Error;

use crate::repo::RepoError;

/// Status code used for not-found outcomes.
///
/// Older clients were built against an API that signalled "not found" with
/// 400, so the mapping stays configurable. Defaults to 404 when never set.
static NOT_FOUND_STATUS: OnceCell<StatusCode> = OnceCell::new();

/// Configure the status code returned for not-found outcomes.
///
/// First call wins; later calls are ignored.
pub fn set_not_found_status(status: StatusCode) {
    let _ = NOT_FOUND_STATUS.set(status);
}

fn not_found_status() -> StatusCode {
    *NOT_FOUND_STATUS.get().unwrap_or(&StatusCode::NOT_FOUND)
}

/// Application-level error types
///
/// Each variant carries the client-facing message and implements automatic
/// conversion to an HTTP response via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required field is missing or empty
    #[error("{0}")]
    Validation(String),

    /// No record matches the request, or a listing came back empty
    #[error("{0}")]
    NotFound(String),

    /// A unique field collided with an existing record
    #[error("{0}")]
    Conflict(String),

    /// The backing store failed or was unreachable
    #[error("store error: {0}")]
    Store(#[from] RepoError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (not_found_status(), message),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),
            AppError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({ "message": message }));

        (status, body).into_response()
    }
}
