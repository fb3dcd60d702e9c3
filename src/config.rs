// src/config.rs
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./inquiries.db";
pub const DEFAULT_WEBSITE_URL: &str = "https://www.zeninstitute.in/";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Retrieval settings used when the institute index is built.
#[derive(Debug, Clone)]
pub struct RagSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separators: Vec<String>,
    pub top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 100,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                String::new(),
            ],
            top_k: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub website_url: String,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub voyage_api_key: Option<String>,
    pub qdrant_url: Option<String>,
    pub qdrant_api_key: Option<String>,
    pub static_dir: String,
    pub host: String,
    pub port: u16,
    pub rag: RagSettings,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = get("PORT").and_then(|p| p.parse::<u16>().ok()).unwrap_or(8000);

        Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            website_url: get("WEBSITE_URL").unwrap_or_else(|| DEFAULT_WEBSITE_URL.to_string()),
            google_api_key: get("GOOGLE_API_KEY").or_else(|| get("GEMINI_API_KEY")),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            voyage_api_key: get("VOYAGEAI_API_KEY"),
            qdrant_url: get("QDRANT_URL"),
            qdrant_api_key: get("QDRANT_API_KEY"),
            static_dir: get("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            rag: RagSettings::default(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
