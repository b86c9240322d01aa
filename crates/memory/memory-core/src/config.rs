//! # Memory Configuration
//!
//! The nested provider mapping a memory manager is built from:
//!
//! ```json
//! {
//!   "llm":      {"provider": "google", "config": {"model": "gemini-pro", "api_key": "..."}},
//!   "embedder": {"provider": "google", "config": {"model": "embedding-001", "api_key": "..."}}
//! }
//! ```

use memo_core::ConfigError;
use serde::{Deserialize, Serialize};

/// Provider names accepted for Gemini.
pub const GEMINI_PROVIDERS: [&str; 2] = ["google", "gemini"];

/// Model, key and endpoint for one provider role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSettings {
    pub model: String,
    /// Falls back to GOOGLE_API_KEY when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// One provider block: `{"provider": ..., "config": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    pub provider: String,
    pub config: ProviderSettings,
}

impl ProviderConfig {
    /// A `google` provider block.
    pub fn google(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            provider: "google".to_string(),
            config: ProviderSettings {
                model: model.into(),
                api_key,
                base_url: None,
            },
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.config.base_url = base_url;
        self
    }

    /// Fails unless the provider is a Gemini alias and a model is named.
    pub fn ensure_gemini(&self, role: &str) -> Result<(), ConfigError> {
        let known = GEMINI_PROVIDERS
            .iter()
            .any(|p| self.provider.eq_ignore_ascii_case(p));
        if !known {
            return Err(ConfigError::UnsupportedProvider {
                role: role.to_string(),
                provider: self.provider.clone(),
            });
        }
        if self.config.model.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{} model must not be empty", role)));
        }
        Ok(())
    }
}

fn default_infer() -> bool {
    true
}

/// Configuration mapping for a memory manager: generation and embedding providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryConfig {
    /// LLM used by the memory manager for fact extraction.
    pub llm: ProviderConfig,
    /// Embedding model used for storing and searching.
    pub embedder: ProviderConfig,
    /// Run fact extraction on `add` (default true).
    #[serde(default = "default_infer")]
    pub infer: bool,
}

impl MemoryConfig {
    /// Gemini for both roles, sharing one (optional) key.
    pub fn gemini(
        llm_model: impl Into<String>,
        embed_model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            llm: ProviderConfig::google(llm_model, api_key.clone()),
            embedder: ProviderConfig::google(embed_model, api_key),
            infer: true,
        }
    }

    pub fn with_infer(mut self, infer: bool) -> Self {
        self.infer = infer;
        self
    }

    /// Parses the JSON mapping form.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Checks both provider blocks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.llm.ensure_gemini("llm")?;
        self.embedder.ensure_gemini("embedder")
    }
}
