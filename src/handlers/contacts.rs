// src/handlers/contacts.rs
use super::{internal_error, ApiError};
use crate::models::contact::{ContactRequest, InquiriesResponse, SaveContactResponse};
use crate::services::ContactService;
use crate::AppState;
use axum::{
    extract::Extension,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

pub fn contact_routes() -> Router {
    Router::new()
        .route("/save_contact", post(save_contact))
        // Unauthenticated on purpose for now; see DESIGN.md
        .route("/inquiries", get(list_inquiries))
}

async fn save_contact(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<SaveContactResponse>, ApiError> {
    tracing::debug!(user_id = ?payload.user_id, "Contact submission received");

    let id = ContactService::save_contact(&state.db_pool, &payload)
        .await
        .map_err(|e| internal_error("Error saving contact", e))?;

    Ok(Json(SaveContactResponse {
        message: "Saved".to_string(),
        id,
    }))
}

async fn list_inquiries(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<InquiriesResponse>, ApiError> {
    let inquiries = ContactService::list_contacts(&state.db_pool)
        .await
        .map_err(|e| internal_error("Error listing inquiries", e))?;

    Ok(Json(InquiriesResponse { inquiries }))
}
