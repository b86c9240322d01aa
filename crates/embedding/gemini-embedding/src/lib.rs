//! # Gemini Embedding Service
//!
//! Implementation of the `EmbeddingService` trait on top of Gemini's `embedContent` and
//! `batchEmbedContents` endpoints.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gemini_embedding::GeminiEmbedding;
//! use embedding::EmbeddingService;
//!
//! async fn example() -> Result<(), anyhow::Error> {
//!     // Falls back to GOOGLE_API_KEY when no key is passed.
//!     let service = GeminiEmbedding::new(None, "embedding-001")?;
//!     let embedding = service.embed("Hello world").await?;
//!     println!("Embedding dimension: {}", embedding.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Models
//!
//! - `embedding-001`: 768 dimensions
//! - `text-embedding-004`: 768 dimensions

use async_trait::async_trait;
use embedding::{EmbeddingConfig, EmbeddingService, DEFAULT_EMBED_MODEL};
use gemini_client::GeminiClient;
use memo_core::{resolve_api_key, ConfigError};
use tracing::info;

/// Gemini embedding service implementation.
#[derive(Debug, Clone)]
pub struct GeminiEmbedding {
    client: GeminiClient,
    model: String,
}

impl GeminiEmbedding {
    /// Creates a new Gemini embedding service.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key. When `None` or empty, GOOGLE_API_KEY is used.
    /// * `model` - The embedding model (e.g. "embedding-001"); a `models/` prefix is accepted.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = resolve_api_key(api_key.as_deref())?;
        Ok(Self {
            client: GeminiClient::new(api_key),
            model: model.into(),
        })
    }

    /// Creates a service with the default model (`embedding-001`).
    pub fn with_api_key(api_key: Option<String>) -> Result<Self, ConfigError> {
        Self::new(api_key, DEFAULT_EMBED_MODEL)
    }

    /// Creates a service from an [`EmbeddingConfig`], honoring its base URL.
    pub fn from_config(config: &dyn EmbeddingConfig) -> Result<Self, ConfigError> {
        let service = Self::new(Some(config.api_key().to_string()), config.model())?;
        Ok(match config.base_url() {
            Some(url) => service.with_base_url(url),
            None => service,
        })
    }

    /// Points the service at another endpoint root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client.set_base_url(base_url);
        self
    }

    /// Returns the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingService for GeminiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        info!(model = %self.model, text_len = text.len(), "Gemini embed request");

        let embedding = self.client.embed_content(&self.model, text).await?;
        if embedding.is_empty() {
            anyhow::bail!("No embedding in response");
        }

        info!(dimension = embedding.len(), "Gemini embed done");
        Ok(embedding)
    }

    /// Embeds all texts in one `batchEmbedContents` call. An empty input makes no request.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        info!(model = %self.model, count = texts.len(), "Gemini embed_batch request");

        let embeddings = self.client.batch_embed_contents(&self.model, texts).await?;
        if embeddings.len() != texts.len() {
            anyhow::bail!(
                "Gemini returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            );
        }

        info!(count = embeddings.len(), "Gemini embed_batch done");
        Ok(embeddings)
    }
}
