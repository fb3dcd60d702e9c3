// src/rag/mod.rs
pub mod embeddings;
pub mod llm;
pub mod loader;
pub mod pipeline;
pub mod splitter;
pub mod vector_index;

pub use embeddings::Embedder;
pub use llm::LanguageModel;
pub use pipeline::{AnswerPipeline, NOT_SURE_MESSAGE};
pub use vector_index::{InMemoryIndex, ScoredChunk, VectorIndex};

/// Failures of the external collaborators behind the answer pipeline.
/// These are logged and degraded, never returned to HTTP callers.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("document fetch failed: {0}")]
    Fetch(String),
    #[error("embedding request failed: {0}")]
    Embedding(String),
    #[error("vector search failed: {0}")]
    VectorSearch(String),
    #[error("language model request failed: {0}")]
    Model(String),
    #[error("language model is not configured")]
    ModelNotConfigured,
}
