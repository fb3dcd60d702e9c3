// src/models/contact.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored lead. Rows are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub course: String,
    pub triggered_question: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    // Accepted but not linked to the stored contact
    pub user_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub course: String,
    pub triggered_question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveContactResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InquiriesResponse {
    pub inquiries: Vec<Contact>,
}
