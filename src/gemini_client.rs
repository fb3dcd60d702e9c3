use crate::rag::UpstreamError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// The key travels in a header so it never shows up in URLs or error messages.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptFeedback {
    #[serde(rename = "blockReason")]
    pub block_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmbedContentRequest {
    pub model: String,
    pub content: Content,
    #[serde(rename = "outputDimensionality")]
    pub output_dimensionality: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmbedContentResponse {
    pub embedding: Embedding,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated. Empty when the model returned nothing.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model,
        }
    }

    /// Points the client at another endpoint, e.g. a regional proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, UpstreamError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        tracing::debug!("Gemini request with {} content block(s)", request.contents.len());

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::Model(format!("Gemini API request failed: {}", e.without_url())))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| UpstreamError::Model(format!("Failed to read Gemini response: {}", e.without_url())))?;

        if !status.is_success() {
            return Err(UpstreamError::Model(format!(
                "Gemini API error ({}): {}",
                status, response_text
            )));
        }

        tracing::debug!(
            "Gemini API response (truncated): {}...",
            response_text.chars().take(300).collect::<String>()
        );

        serde_json::from_str::<GenerateContentResponse>(&response_text).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            UpstreamError::Model(format!("error decoding response body: {}", e))
        })
    }

    /// Single-turn text generation.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, UpstreamError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
                role: Some("user".to_string()),
            }],
        };

        let response = self.generate_content(request).await?;
        if let Some(reason) = response.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_ref()) {
            tracing::warn!("Gemini blocked the prompt: {}", reason);
        }
        Ok(response.text())
    }

    pub async fn embed_content(&self, text: &str) -> Result<Vec<f32>, UpstreamError> {
        let url = format!("{}/models/text-embedding-004:embedContent", self.base_url);

        let request = EmbedContentRequest {
            model: "models/text-embedding-004".to_string(),
            content: Content {
                parts: vec![Part {
                    text: Some(text.to_string()),
                }],
                role: None,
            },
            output_dimensionality: Some(768),
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::Embedding(format!("Gemini embedding request failed: {}", e.without_url())))?;

        if response.status().is_success() {
            let result: EmbedContentResponse = response
                .json()
                .await
                .map_err(|e| UpstreamError::Embedding(format!("Failed to parse Gemini embedding: {}", e.without_url())))?;
            Ok(result.embedding.values)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(UpstreamError::Embedding(format!("Gemini Embedding API error: {}", error_text)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let raw = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Classes run "}, {"text": "on weekdays."}]},
                 "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text(), "Classes run on weekdays.");
    }

    #[test]
    fn blocked_response_has_empty_text() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(response.text(), "");
    }

    #[test]
    fn parts_without_text_are_skipped() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"thoughtSignature": "abc"}, {"text": "ok"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text(), "ok");
    }

    #[tokio::test]
    async fn transport_errors_do_not_leak_the_api_key() {
        let client = GeminiClient::new("SECRET-KEY-123".to_string(), "gemini-2.5-flash".to_string())
            .with_base_url("http://127.0.0.1:1");

        let err = client.generate_text("hello").await.unwrap_err();
        let logged = format!("RAG error: {}", err);
        assert!(matches!(err, UpstreamError::Model(_)));
        assert!(!logged.contains("SECRET-KEY-123"), "{}", logged);

        let err = client.embed_content("hello").await.unwrap_err();
        assert!(!err.to_string().contains("SECRET-KEY-123"));
    }

    #[tokio::test]
    async fn api_key_is_sent_as_header() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/models/gemini-2.5-flash:generateContent"))
            .and(wiremock::matchers::header("x-goog-api-key", "test-key"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "Batches start in June."}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key".to_string(), "gemini-2.5-flash".to_string())
            .with_base_url(server.uri());

        let text = client.generate_text("When do batches start?").await.unwrap();
        assert_eq!(text, "Batches start in June.");

        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| !r.url.as_str().contains("test-key")));
    }

    #[tokio::test]
    async fn server_error_becomes_model_error() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(500).set_body_string("backend unavailable"))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key".to_string(), "gemini-2.5-flash".to_string())
            .with_base_url(server.uri());

        match client.generate_text("hi").await {
            Err(UpstreamError::Model(message)) => {
                assert!(message.contains("500"));
                assert!(message.contains("backend unavailable"));
            }
            other => panic!("expected model error, got {:?}", other),
        }
    }

    #[test]
    fn request_serializes_in_api_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some("hi".to_string()) }],
                role: Some("user".to_string()),
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["contents"][0]["role"], "user");
    }
}
