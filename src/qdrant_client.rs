use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;

use crate::rag::{ScoredChunk, UpstreamError, VectorIndex};

const UPSERT_BATCH: usize = 128;

/// Institute chunks stored in a Qdrant collection.
#[derive(Clone)]
pub struct QdrantClient {
    client: Qdrant,
    collection_name: String,
    points: usize,
}

impl QdrantClient {
    pub fn new(url: &str, api_key: Option<String>) -> Result<Self, UpstreamError> {
        let mut client_builder = Qdrant::from_url(url);

        if let Some(key) = api_key {
            client_builder = client_builder.api_key(key);
        }

        let client = client_builder
            .build()
            .map_err(|e| UpstreamError::VectorSearch(format!("Failed to connect to Qdrant: {}", e)))?;

        Ok(Self {
            client,
            collection_name: "institute_chunks".to_string(),
            points: 0,
        })
    }

    /// Drops and recreates the collection, then uploads every chunk.
    /// The site is re-indexed on each startup, so stale points are never kept.
    pub async fn rebuild(
        mut self,
        texts: Vec<String>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<Self, UpstreamError> {
        let dimensions = vectors.first().map(|v| v.len()).unwrap_or(0);
        if dimensions == 0 {
            return Err(UpstreamError::VectorSearch("No vectors to index".to_string()));
        }

        if let Err(e) = self.client.delete_collection(self.collection_name.as_str()).await {
            tracing::debug!("Qdrant collection '{}' not deleted: {}", self.collection_name, e);
        }

        tracing::info!("Creating Qdrant collection: {}", self.collection_name);
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| UpstreamError::VectorSearch(format!("Failed to create collection: {}", e)))?;

        let mut points = Vec::with_capacity(texts.len());
        for (i, (text, vector)) in texts.into_iter().zip(vectors).enumerate() {
            let payload: Payload = json!({ "text": text, "chunk_index": i })
                .try_into()
                .map_err(|e| UpstreamError::VectorSearch(format!("Invalid payload: {}", e)))?;
            points.push(PointStruct::new(i as u64, vector, payload));
        }
        let count = points.len();

        for batch in points.chunks(UPSERT_BATCH) {
            self.client
                .upsert_points(
                    UpsertPointsBuilder::new(&self.collection_name, batch.to_vec()).wait(true),
                )
                .await
                .map_err(|e| UpstreamError::VectorSearch(format!("Failed to upsert chunks: {}", e)))?;
        }

        self.points = count;
        tracing::info!("Indexed {} chunk(s) in Qdrant collection '{}'", count, self.collection_name);
        Ok(self)
    }
}

#[async_trait]
impl VectorIndex for QdrantClient {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, UpstreamError> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection_name, query.to_vec(), k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| UpstreamError::VectorSearch(e.to_string()))?;

        let chunks = search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let text = point
                    .payload
                    .get("text")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())?;
                Some(ScoredChunk {
                    text,
                    score: point.score,
                })
            })
            .collect();

        Ok(chunks)
    }

    fn len(&self) -> usize {
        self.points
    }

    fn backend(&self) -> &'static str {
        "qdrant"
    }
}
