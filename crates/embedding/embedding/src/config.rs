//! Embedding configuration: trait and env-based implementation.

use anyhow::Result;
use memo_core::{resolve_api_key, ConfigError};
use std::env;

/// Embedding model used when GEMINI_EMBED_MODEL is not set.
pub const DEFAULT_EMBED_MODEL: &str = "embedding-001";

/// Embedding service configuration interface.
pub trait EmbeddingConfig: Send + Sync {
    fn provider(&self) -> &str;
    fn model(&self) -> &str;
    fn api_key(&self) -> &str;
    /// Optional endpoint root (GEMINI_BASE_URL).
    fn base_url(&self) -> Option<&str>;
}

/// Embedding config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvEmbeddingConfig {
    pub embedding_provider: String,
    pub embedding_model: String,
    pub google_api_key: String,
    pub gemini_base_url: Option<String>,
}

impl EmbeddingConfig for EnvEmbeddingConfig {
    fn provider(&self) -> &str {
        &self.embedding_provider
    }
    fn model(&self) -> &str {
        &self.embedding_model
    }
    fn api_key(&self) -> &str {
        &self.google_api_key
    }
    fn base_url(&self) -> Option<&str> {
        self.gemini_base_url.as_deref().filter(|s| !s.is_empty())
    }
}

impl EnvEmbeddingConfig {
    /// Load from environment variables: EMBEDDING_PROVIDER, GEMINI_EMBED_MODEL, GOOGLE_API_KEY, GEMINI_BASE_URL.
    pub fn from_env() -> Result<Self> {
        let embedding_provider =
            env::var("EMBEDDING_PROVIDER").unwrap_or_else(|_| "google".to_string());
        let embedding_model = env::var("GEMINI_EMBED_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string());
        let google_api_key = resolve_api_key(None)?;
        let gemini_base_url = env::var("GEMINI_BASE_URL").ok().filter(|s| !s.trim().is_empty());
        Ok(Self {
            embedding_provider,
            embedding_model,
            google_api_key,
            gemini_base_url,
        })
    }

    /// Validate config: only the Gemini provider (`google` / `gemini`) is supported.
    pub fn validate(&self) -> Result<()> {
        let provider = self.embedding_provider.as_str();
        if !provider.eq_ignore_ascii_case("google") && !provider.eq_ignore_ascii_case("gemini") {
            return Err(ConfigError::UnsupportedProvider {
                role: "embedder".to_string(),
                provider: provider.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
