//! # Gemini API client
//!
//! Thin wrapper around the Gemini REST API: `generateContent` for text generation and
//! `embedContent` / `batchEmbedContents` for embeddings. Authentication uses the
//! `x-goog-api-key` header; keys only ever reach the logs through [`mask_token`].

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, instrument};

mod types;

use types::{
    BatchEmbedContentsRequest, BatchEmbedContentsResponse, EmbedContentRequest,
    EmbedContentResponse,
};
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part, PromptFeedback,
    UsageMetadata,
};

/// Public Gemini API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// API version segment used for every request.
pub const API_VERSION: &str = "v1beta";

/// Masks an API key for safe logging: first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[len - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Strips a leading `models/` so that `models/gemini-pro` and `gemini-pro` name the same model.
pub fn normalize_model(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}

/// Gemini REST client. Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &mask_token(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiClient {
    /// Builds a client against the public endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Builds a client with a custom base URL (proxies, compatible gateways, test servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replaces the endpoint root, keeping the key and the connection pool.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/{}/models/{}:{}",
            self.base_url,
            API_VERSION,
            normalize_model(model),
            method
        )
    }

    /// POSTs `body` to `models/{model}:{method}` and decodes the JSON response.
    /// Non-2xx statuses become errors carrying the status and the response body.
    async fn post<B, R>(&self, model: &str, method: &str, body: &B) -> anyhow::Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(model, method))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        Ok(response.json().await?)
    }

    /// Calls `generateContent` and returns the decoded response.
    #[instrument(skip(self, request), fields(api_key = %mask_token(&self.api_key)))]
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> anyhow::Result<GenerateContentResponse> {
        info!(
            model = %normalize_model(model),
            content_count = request.contents.len(),
            "Gemini generateContent request"
        );

        let response: GenerateContentResponse =
            self.post(model, "generateContent", request).await?;

        if let Some(ref u) = response.usage_metadata {
            info!(
                prompt_tokens = u.prompt_token_count,
                completion_tokens = u.candidates_token_count,
                total_tokens = u.total_token_count,
                "Gemini generateContent usage"
            );
        }
        Ok(response)
    }

    /// Calls `embedContent` for one text and returns its vector.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn embed_content(&self, model: &str, text: &str) -> anyhow::Result<Vec<f32>> {
        let request = EmbedContentRequest {
            model: format!("models/{}", normalize_model(model)),
            content: Content::text(text),
        };
        let response: EmbedContentResponse = self.post(model, "embedContent", &request).await?;
        Ok(response.embedding.values)
    }

    /// Calls `batchEmbedContents`; vectors come back in input order.
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    pub async fn batch_embed_contents(
        &self,
        model: &str,
        texts: &[String],
    ) -> anyhow::Result<Vec<Vec<f32>>> {
        let model_path = format!("models/{}", normalize_model(model));
        let request = BatchEmbedContentsRequest {
            requests: texts
                .iter()
                .map(|t| EmbedContentRequest {
                    model: model_path.clone(),
                    content: Content::text(t.as_str()),
                })
                .collect(),
        };
        let response: BatchEmbedContentsResponse =
            self.post(model, "batchEmbedContents", &request).await?;
        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }
}
