//! Gemini implementation of [`LlmClient`]: wraps `gemini-client` and sends one user turn per call.

use anyhow::Result;
use async_trait::async_trait;
use gemini_client::{Content, GeminiClient, GenerateContentRequest};
use memo_core::{resolve_api_key, ConfigError};
use tracing::{info, instrument};

use crate::{GenerateOptions, LlmClient, LlmConfig};

/// Model used when the caller does not name one.
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash-preview-05-20";

/// Generation client holding an API key and a model identifier.
#[derive(Debug, Clone)]
pub struct GeminiLlm {
    client: GeminiClient,
    model: String,
}

impl GeminiLlm {
    /// Builds a client. `api_key` falls back to `GOOGLE_API_KEY`; when neither is set this
    /// returns [`ConfigError::MissingApiKey`] without touching the network.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = resolve_api_key(api_key.as_deref())?;
        Ok(Self {
            client: GeminiClient::new(api_key),
            model: model.into(),
        })
    }

    /// Same as [`new`](Self::new) with [`DEFAULT_MODEL`].
    pub fn with_default_model(api_key: Option<String>) -> Result<Self, ConfigError> {
        Self::new(api_key, DEFAULT_MODEL)
    }

    /// Builds a client from any [`LlmConfig`], honoring its base URL override.
    pub fn from_config(config: &dyn LlmConfig) -> Result<Self, ConfigError> {
        let llm = Self::new(Some(config.api_key().to_string()), config.model())?;
        Ok(match config.base_url() {
            Some(url) => llm.with_base_url(url),
            None => llm,
        })
    }

    /// Points the client at another endpoint root, keeping key and model.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client.set_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(prompt: &str, options: &GenerateOptions) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user_text(prompt)],
            generation_config: options.generation_config.clone(),
            safety_settings: options.safety_settings.clone(),
            system_instruction: options.system_instruction.as_deref().map(Content::text),
        }
    }
}

#[async_trait]
impl LlmClient for GeminiLlm {
    #[instrument(skip(self, prompt, options), fields(model = %self.model))]
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        info!(prompt_len = prompt.len(), "Gemini generate");
        let request = Self::build_request(prompt, options);
        let response = self.client.generate_content(&self.model, &request).await?;
        let text = response.text()?;
        info!(response_len = text.len(), "Gemini generate done");
        Ok(text)
    }
}
