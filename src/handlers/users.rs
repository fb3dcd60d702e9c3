// src/handlers/users.rs
use super::{internal_error, ApiError};
use crate::models::user::CreateUserResponse;
use crate::services::UserService;
use crate::AppState;
use axum::{extract::Extension, routing::get, Json, Router};
use std::sync::Arc;

pub fn user_routes() -> Router {
    Router::new().route("/create_user", get(create_user))
}

async fn create_user(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    let user_id = UserService::create_user(&state.db_pool)
        .await
        .map_err(|e| internal_error("Error creating user", e))?;

    Ok(Json(CreateUserResponse { user_id }))
}
