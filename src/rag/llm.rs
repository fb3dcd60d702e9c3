// src/rag/llm.rs
use async_trait::async_trait;

use super::UpstreamError;
use crate::gemini_client::GeminiClient;

/// A generative model that turns a prompt into free text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;
    fn name(&self) -> &str;
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        self.generate_text(prompt).await
    }

    fn name(&self) -> &str {
        self.model()
    }
}
