// src/handlers/ui.rs
use crate::AppState;
use axum::{
    extract::Extension,
    response::{Json, Redirect},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::services::ServeDir;

pub fn ui_routes(static_dir: &str) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/status", get(api_status))
        .nest_service("/static", ServeDir::new(static_dir))
}

async fn home() -> Redirect {
    Redirect::temporary("/static/index.html")
}

async fn api_status(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let db_status = match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            "error"
        }
    };
    let pipeline = &state.pipeline;
    let model_status = if pipeline.model_configured() { "configured" } else { "not_configured" };

    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
            "language_model": model_status,
            "embeddings": pipeline.embedder_name(),
            "vector_index": pipeline.index_backend(),
        },
        "indexed_chunks": pipeline.indexed_chunks(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_state, ScriptedModel};
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn root_redirects_to_static_index() {
        let response = home().await.into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/static/index.html"
        );
    }

    #[tokio::test]
    async fn status_reports_configured_services() {
        let state = test_state(Some(ScriptedModel::new(vec![]))).await;

        let Json(body) = api_status(Extension(state)).await;
        assert_eq!(body["status"], "operational");
        assert_eq!(body["services"]["database"], "connected");
        assert_eq!(body["services"]["language_model"], "configured");
        assert_eq!(body["services"]["embeddings"], "hashed");
        assert_eq!(body["services"]["vector_index"], "in_memory");
        assert_eq!(body["indexed_chunks"], 1);
    }
}
