// lib.rs - institute chatbot backend: keyword routing, RAG answers and lead capture
pub mod classifier;
pub mod config;
pub mod db;
pub mod gemini_client;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod qdrant_client;
pub mod rag;
pub mod services;
pub mod voyage_embeddings;

#[cfg(test)]
mod test_support;

use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Process-wide state shared by all handlers. The pipeline is read-only after startup.
pub struct AppState {
    pub db_pool: sqlx::SqlitePool,
    pub pipeline: Arc<rag::AnswerPipeline>,
}

pub fn build_router(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .merge(handlers::ui::ui_routes(static_dir))
        .merge(handlers::users::user_routes())
        .merge(handlers::chat::chat_routes())
        .merge(handlers::contacts::contact_routes())
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
