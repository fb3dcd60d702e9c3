// src/handlers/mod.rs
pub mod chat;
pub mod contacts;
pub mod ui;
pub mod users;

use crate::models::ErrorResponse;
use axum::{http::StatusCode, Json};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Persistence failures surface as a generic 500; details stay in the logs.
pub fn internal_error(context: &str, err: sqlx::Error) -> ApiError {
    tracing::error!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            success: false,
            message: "Internal server error".to_string(),
        }),
    )
}
