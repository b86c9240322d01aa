//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and the Gemini implementation [`GeminiLlm`].
//!
//! Both operations are stateless pass-throughs: [`LlmClient::generate`] forwards one prompt,
//! [`LlmClient::chat`] flattens a transcript with [`prompt::flatten_messages`] and forwards the
//! result to `generate`. No retries, no conversation state.

use anyhow::Result;
use async_trait::async_trait;
use prompt::{flatten_messages, ChatMessage};
use serde_json::{Map, Value};

mod config;
mod gemini_llm;

pub use config::{EnvLlmConfig, LlmConfig};
pub use gemini_llm::{GeminiLlm, DEFAULT_MODEL};

/// Passthrough options forwarded to the generation endpoint unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateOptions {
    /// Free-form `generationConfig` object (`temperature`, `maxOutputTokens`, ...).
    pub generation_config: Option<Map<String, Value>>,
    /// Raw `safetySettings` entries.
    pub safety_settings: Option<Vec<Value>>,
    /// Text sent as `systemInstruction`.
    pub system_instruction: Option<String>,
}

impl GenerateOptions {
    /// Sets one `generationConfig` field.
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.generation_config
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_system_instruction(mut self, text: impl Into<String>) -> Self {
        self.system_instruction = Some(text.into());
        self
    }
}

/// Text generation interface.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model's reply text for `prompt`. Endpoint errors are propagated as-is.
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String>;

    /// Flattens `messages` into `"<Role>: <content>"` lines and delegates to [`generate`](Self::generate).
    async fn chat(&self, messages: &[ChatMessage], options: &GenerateOptions) -> Result<String> {
        let prompt = flatten_messages(messages);
        self.generate(&prompt, options).await
    }
}
