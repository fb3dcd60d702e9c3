// src/rag/vector_index.rs
use async_trait::async_trait;
use std::cmp::Ordering;

use super::UpstreamError;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
}

/// Nearest-neighbour lookup over the indexed institute chunks. Read-only once built.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, UpstreamError>;
    fn len(&self) -> usize;
    fn backend(&self) -> &'static str;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;

    if denom <= f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

/// Exact cosine search over vectors held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    entries: Vec<(String, Vec<f32>)>,
}

impl InMemoryIndex {
    /// Pairs texts with their vectors; extra items on either side are dropped.
    pub fn new(texts: Vec<String>, vectors: Vec<Vec<f32>>) -> Self {
        if texts.len() != vectors.len() {
            tracing::warn!(
                "Index input mismatch: {} texts vs {} vectors",
                texts.len(),
                vectors.len()
            );
        }
        Self {
            entries: texts.into_iter().zip(vectors).collect(),
        }
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, UpstreamError> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(text, vector)| ScoredChunk {
                text: text.clone(),
                score: cosine_similarity(query, vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn backend(&self) -> &'static str {
        "in_memory"
    }
}
