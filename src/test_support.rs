// src/test_support.rs
//! Shared doubles for unit tests: an in-memory database, scripted models and
//! fixed embedders, so no test touches the network.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::config::RagSettings;
use crate::db::run_migrations;
use crate::rag::embeddings::HashedEmbedder;
use crate::rag::{AnswerPipeline, Embedder, LanguageModel, UpstreamError};
use crate::AppState;

/// Single-connection in-memory database with the schema applied.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations");
    pool
}

/// Replays scripted responses and records every prompt it receives.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, UpstreamError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Result<String, UpstreamError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub struct FixedEmbedder;

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, UpstreamError> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }

    async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, UpstreamError> {
        Ok(vec![1.0, 0.0])
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

pub struct BrokenEmbedder;

#[async_trait]
impl Embedder for BrokenEmbedder {
    async fn embed_documents(&self, _texts: Vec<String>) -> Result<Vec<Vec<f32>>, UpstreamError> {
        Err(UpstreamError::Embedding("offline".to_string()))
    }

    async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, UpstreamError> {
        Err(UpstreamError::Embedding("offline".to_string()))
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

/// App state over an in-memory database and a small indexed page.
pub async fn test_state(model: Option<Arc<ScriptedModel>>) -> Arc<AppState> {
    let pipeline = AnswerPipeline::from_document(
        Ok("Zen Institute offers Python, Java and data science training.".to_string()),
        &RagSettings::default(),
        Arc::new(HashedEmbedder::default()),
        model.map(|m| m as Arc<dyn LanguageModel>),
    )
    .await;

    Arc::new(AppState {
        db_pool: test_pool().await,
        pipeline: Arc::new(pipeline),
    })
}
