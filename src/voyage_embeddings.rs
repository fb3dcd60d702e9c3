use crate::rag::UpstreamError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Inputs per request. The API allows 128, but 64 chunks of 500 chars keeps a
/// batch well inside its per-request token limit.
const MAX_BATCH: usize = 64;

#[derive(Debug, Clone)]
pub struct VoyageEmbeddings {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    input: Vec<String>,
    model: String,
    input_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl VoyageEmbeddings {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.voyageai.com/v1".to_string(),
            model: "voyage-3".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `input_type` is "document" for indexed chunks and "query" for questions.
    pub async fn generate_embeddings(
        &self,
        texts: Vec<String>,
        input_type: &'static str,
    ) -> Result<Vec<Vec<f32>>, UpstreamError> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_BATCH) {
            let request = EmbeddingRequest {
                input: batch.to_vec(),
                model: self.model.clone(),
                input_type,
            };

            let response = self
                .client
                .post(format!("{}/embeddings", self.base_url))
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await
                .map_err(|e| UpstreamError::Embedding(format!("Voyage AI API request failed: {}", e.without_url())))?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                return Err(UpstreamError::Embedding(format!(
                    "Voyage AI API error ({}): {}",
                    status, error_text
                )));
            }

            let embedding_response: EmbeddingResponse = response
                .json()
                .await
                .map_err(|e| UpstreamError::Embedding(format!("Failed to parse Voyage AI response: {}", e)))?;

            if embedding_response.data.len() != batch.len() {
                return Err(UpstreamError::Embedding(format!(
                    "Voyage AI returned {} embeddings for {} inputs",
                    embedding_response.data.len(),
                    batch.len()
                )));
            }
            vectors.extend(embedding_response.data.into_iter().map(|d| d.embedding));
        }

        Ok(vectors)
    }

    pub async fn generate_single_embedding(&self, text: String) -> Result<Vec<f32>, UpstreamError> {
        let embeddings = self.generate_embeddings(vec![text], "query").await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::Embedding("No embedding returned".to_string()))
    }
}
