//! LLM configuration: trait and env-based implementation.

use anyhow::Result;
use std::env;

use memo_core::resolve_api_key;

use crate::gemini_llm::DEFAULT_MODEL;

/// LLM configuration interface for the Gemini API.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> Option<&str>;
    fn model(&self) -> &str;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub google_api_key: String,
    pub gemini_base_url: Option<String>,
    pub llm_model: String,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.google_api_key
    }
    fn base_url(&self) -> Option<&str> {
        self.gemini_base_url.as_deref()
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
}

impl EnvLlmConfig {
    /// Load from environment variables: GOOGLE_API_KEY (required), GEMINI_MODEL, GEMINI_BASE_URL.
    pub fn from_env() -> Result<Self> {
        let google_api_key = resolve_api_key(None)?;
        let gemini_base_url = env::var("GEMINI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let llm_model = env::var("GEMINI_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            google_api_key,
            gemini_base_url,
            llm_model,
        })
    }
}
