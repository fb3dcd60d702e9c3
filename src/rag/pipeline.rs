// src/rag/pipeline.rs
use std::sync::Arc;

use super::embeddings::HashedEmbedder;
use super::loader::WebPageLoader;
use super::splitter::TextSplitter;
use super::{Embedder, InMemoryIndex, LanguageModel, UpstreamError, VectorIndex};
use crate::config::{AppConfig, RagSettings};
use crate::gemini_client::GeminiClient;
use crate::qdrant_client::QdrantClient;
use crate::voyage_embeddings::VoyageEmbeddings;

pub const NOT_SURE_MESSAGE: &str = "I am not fully sure based on the available information. Please fill the contact form and our team will help you.";

/// Substrings (lowercase) that mark a grounded answer as low confidence.
/// Matches anywhere in the text, including inside quoted source material.
pub const LOW_CONFIDENCE_PHRASES: &[&str] = &["not contain", "not available", "i am not sure"];

const PROMPT_TEMPLATE: &str = "
You are the official assistant for Zen Institute. Answer using ONLY the context below. If the exact answer is not contained, say you are not fully sure and suggest contacting the institute.

Context:
{context}

Question:
{question}

Answer:
";

pub fn build_prompt(context: &str, question: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{context}", context)
        .replace("{question}", question)
}

pub fn is_low_confidence(answer: &str) -> bool {
    let lowered = answer.to_lowercase();
    LOW_CONFIDENCE_PHRASES.iter().any(|p| lowered.contains(p))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Retrieval,
    DirectModel,
    NotSure,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Retrieval => "retrieval",
            AnswerSource::DirectModel => "direct_model",
            AnswerSource::NotSure => "not_sure",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
}

/// Retrieval-augmented answering over the institute website with a direct-model
/// fallback. Built once at startup and shared read-only between requests.
pub struct AnswerPipeline {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
    llm: Option<Arc<dyn LanguageModel>>,
    top_k: usize,
}

impl AnswerPipeline {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
        llm: Option<Arc<dyn LanguageModel>>,
        top_k: usize,
    ) -> Self {
        Self { index, embedder, llm, top_k }
    }

    /// Fetches, chunks, embeds and indexes the configured website.
    /// Upstream failures leave an empty index rather than aborting startup.
    pub async fn initialize(config: &AppConfig) -> Self {
        let embedder: Arc<dyn Embedder> = match (&config.voyage_api_key, &config.google_api_key) {
            (Some(key), _) => {
                tracing::info!("Using Voyage AI embeddings");
                Arc::new(VoyageEmbeddings::new(key.clone()))
            }
            (None, Some(key)) => {
                tracing::info!("Using Gemini embeddings");
                Arc::new(GeminiClient::new(key.clone(), config.gemini_model.clone()))
            }
            (None, None) => {
                tracing::warn!("No embedding credentials found. Using placeholder hashed embeddings.");
                tracing::info!("To enable hosted embeddings, set: VOYAGEAI_API_KEY or GOOGLE_API_KEY");
                Arc::new(HashedEmbedder::default())
            }
        };

        let llm: Option<Arc<dyn LanguageModel>> = match &config.google_api_key {
            Some(key) => {
                tracing::info!("Initializing Gemini client ({})...", config.gemini_model);
                Some(Arc::new(GeminiClient::new(key.clone(), config.gemini_model.clone())))
            }
            None => {
                tracing::warn!("GOOGLE_API_KEY not found. Model-backed answers are disabled.");
                None
            }
        };

        // Without a model nothing ever queries the index, so don't fetch or embed.
        let (texts, vectors) = if llm.is_some() {
            let document = WebPageLoader::new().load(&config.website_url).await;
            prepare_chunks(document, &config.rag, embedder.as_ref()).await
        } else {
            tracing::warn!("Skipping content indexing: no language model configured");
            (Vec::new(), Vec::new())
        };

        let index: Arc<dyn VectorIndex> = match &config.qdrant_url {
            Some(url) if !texts.is_empty() => {
                let built = match QdrantClient::new(url, config.qdrant_api_key.clone()) {
                    Ok(client) => client.rebuild(texts.clone(), vectors.clone()).await,
                    Err(e) => Err(e),
                };
                match built {
                    Ok(client) => Arc::new(client) as Arc<dyn VectorIndex>,
                    Err(e) => {
                        tracing::error!("Failed to initialize Qdrant index: {}. Using in-memory index.", e);
                        Arc::new(InMemoryIndex::new(texts, vectors))
                    }
                }
            }
            _ => Arc::new(InMemoryIndex::new(texts, vectors)),
        };

        tracing::info!(
            backend = index.backend(),
            chunks = index.len(),
            embedder = embedder.name(),
            model = llm.as_ref().map(|m| m.name()).unwrap_or("none"),
            "Answer pipeline ready"
        );

        Self::new(index, embedder, llm, config.rag.top_k)
    }

    /// Builds an in-memory pipeline from already-fetched page text.
    pub async fn from_document(
        document: Result<String, UpstreamError>,
        settings: &RagSettings,
        embedder: Arc<dyn Embedder>,
        llm: Option<Arc<dyn LanguageModel>>,
    ) -> Self {
        let (texts, vectors) = prepare_chunks(document, settings, embedder.as_ref()).await;
        let index = Arc::new(InMemoryIndex::new(texts, vectors));
        Self::new(index, embedder, llm, settings.top_k)
    }

    pub fn indexed_chunks(&self) -> usize {
        self.index.len()
    }

    pub fn index_backend(&self) -> &'static str {
        self.index.backend()
    }

    pub fn embedder_name(&self) -> &'static str {
        self.embedder.name()
    }

    pub fn model_configured(&self) -> bool {
        self.llm.is_some()
    }

    pub async fn answer(&self, question: &str) -> String {
        self.answer_with_source(question).await.text
    }

    pub async fn answer_with_source(&self, question: &str) -> Answer {
        match self.retrieval_answer(question).await {
            Ok(text) if !text.is_empty() && !is_low_confidence(&text) => {
                return Answer { text, source: AnswerSource::Retrieval };
            }
            Ok(text) if text.is_empty() => tracing::debug!("Retrieval produced no answer"),
            Ok(_) => tracing::debug!("Retrieval answer flagged as low confidence"),
            Err(UpstreamError::ModelNotConfigured) => {
                tracing::debug!("Retrieval skipped: language model is not configured")
            }
            Err(e) => tracing::warn!("RAG error: {}", e),
        }

        match self.direct_answer(question).await {
            Ok(text) if !text.is_empty() => {
                return Answer { text, source: AnswerSource::DirectModel };
            }
            Ok(_) => tracing::debug!("Direct model produced no answer"),
            Err(UpstreamError::ModelNotConfigured) => {}
            Err(e) => tracing::warn!("LLM error: {}", e),
        }

        Answer {
            text: NOT_SURE_MESSAGE.to_string(),
            source: AnswerSource::NotSure,
        }
    }

    async fn retrieval_answer(&self, question: &str) -> Result<String, UpstreamError> {
        let llm = self.llm.as_ref().ok_or(UpstreamError::ModelNotConfigured)?;

        let query = self.embedder.embed_query(question).await?;
        let chunks = self.index.search(&query, self.top_k).await?;
        tracing::debug!("Retrieved {} chunk(s) for question", chunks.len());

        let context = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        llm.generate(&build_prompt(&context, question)).await
    }

    async fn direct_answer(&self, question: &str) -> Result<String, UpstreamError> {
        let llm = self.llm.as_ref().ok_or(UpstreamError::ModelNotConfigured)?;
        llm.generate(question).await
    }
}

async fn prepare_chunks(
    document: Result<String, UpstreamError>,
    settings: &RagSettings,
    embedder: &dyn Embedder,
) -> (Vec<String>, Vec<Vec<f32>>) {
    let text = match document {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to load institute content: {}", e);
            return (Vec::new(), Vec::new());
        }
    };

    let texts = TextSplitter::from_settings(settings).split_text(&text);
    if texts.is_empty() {
        tracing::warn!("Institute content produced no chunks");
        return (Vec::new(), Vec::new());
    }
    tracing::info!("Split institute content into {} chunk(s)", texts.len());

    match embedder.embed_documents(texts.clone()).await {
        Ok(vectors) => (texts, vectors),
        Err(e) => {
            tracing::error!("Failed to embed institute content: {}", e);
            (Vec::new(), Vec::new())
        }
    }
}
