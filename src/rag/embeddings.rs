// src/rag/embeddings.rs
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::UpstreamError;
use crate::gemini_client::GeminiClient;
use crate::voyage_embeddings::VoyageEmbeddings;

/// Dimension of the placeholder hashed embedding (same width as MiniLM sentence vectors).
pub const HASHED_DIMENSIONS: usize = 384;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, UpstreamError>;
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, UpstreamError>;
    fn name(&self) -> &'static str;
}

#[async_trait]
impl Embedder for VoyageEmbeddings {
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, UpstreamError> {
        self.generate_embeddings(texts, "document").await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, UpstreamError> {
        self.generate_single_embedding(text.to_string()).await
    }

    fn name(&self) -> &'static str {
        "voyage"
    }
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, UpstreamError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in &texts {
            vectors.push(self.embed_content(text).await?);
        }
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, UpstreamError> {
        self.embed_content(text).await
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Deterministic bag-of-words embedding used when no embedding service is configured.
/// Each lowercase alphanumeric token is hashed into a bucket, then the vector is normalized.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimensions: usize,
}

impl HashedEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions: dimensions.max(1) }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimensions as u64) as usize;
            embedding[bucket] += 1.0;
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for val in embedding.iter_mut() {
                *val /= magnitude;
            }
        }

        embedding
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new(HASHED_DIMENSIONS)
    }
}

#[async_trait]
impl Embedder for HashedEmbedder {
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, UpstreamError> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, UpstreamError> {
        Ok(self.embed(text))
    }

    fn name(&self) -> &'static str {
        "hashed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::vector_index::cosine_similarity;

    #[test]
    fn hashed_embedding_is_normalized_and_deterministic() {
        let embedder = HashedEmbedder::default();
        let a = embedder.embed("Python training for beginners");
        let b = embedder.embed("python TRAINING for beginners");

        assert_eq!(a.len(), HASHED_DIMENSIONS);
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_text_gives_zero_vector() {
        let embedder = HashedEmbedder::new(8);
        assert!(embedder.embed("  ...  ").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn shared_words_score_higher_than_unrelated_text() {
        let embedder = HashedEmbedder::default();
        let query = embedder.embed("weekend batch timings");
        let related = embedder.embed("Weekend batch timings are 10am to 1pm");
        let unrelated = embedder.embed("Our campus has a large library");

        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }

    #[tokio::test]
    async fn embed_documents_keeps_input_order() {
        let embedder = HashedEmbedder::default();
        let vectors = embedder
            .embed_documents(vec!["alpha".to_string(), "beta".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], embedder.embed("alpha"));
        assert_eq!(vectors[1], embedder.embed("beta"));
    }
}
