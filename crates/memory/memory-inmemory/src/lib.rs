//! # In-Memory Vector Memory
//!
//! [`VectorMemory`] implements the `MemoryManager` trait from `memory-core` with records held in
//! process memory. Vectors come from an [`EmbeddingService`]; when an [`LlmClient`] is attached,
//! `add` first asks it to split the input into standalone facts.
//!
//! ## Example
//!
//! ```rust,no_run
//! use memory_core::{AddOptions, MemoryConfig, MemoryManager, SearchOptions};
//! use memory_inmemory::VectorMemory;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), anyhow::Error> {
//!     let config = MemoryConfig::gemini("gemini-pro", "embedding-001", None);
//!     let memory = VectorMemory::from_config(&config)?;
//!
//!     memory.add("My favorite color is blue.", AddOptions::for_user("user123")).await?;
//!     let hits = memory
//!         .search("What is my favorite color?", SearchOptions::for_user("user123"))
//!         .await?;
//!     println!("{} hit(s)", hits.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Thread Safety
//!
//! Records live behind `Arc<RwLock<>>`; clones share the same store.

use std::sync::Arc;

use async_trait::async_trait;
use embedding::{EmbeddingConfig, EmbeddingService};
use gemini_embedding::GeminiEmbedding;
use llm_client::{GeminiLlm, LlmClient};
use memo_core::{resolve_api_key, ConfigError};
use memory_core::{
    AddOptions, MemoryConfig, MemoryFilter, MemoryManager, MemoryRecord, ProviderConfig,
    SearchOptions,
};
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

mod facts;

pub use facts::parse_facts;

/// Embedder block of a [`MemoryConfig`] with its key already resolved.
struct EmbedderBlock<'a> {
    block: &'a ProviderConfig,
    api_key: String,
}

impl EmbeddingConfig for EmbedderBlock<'_> {
    fn provider(&self) -> &str {
        &self.block.provider
    }
    fn model(&self) -> &str {
        &self.block.config.model
    }
    fn api_key(&self) -> &str {
        &self.api_key
    }
    fn base_url(&self) -> Option<&str> {
        self.block.config.base_url.as_deref().filter(|s| !s.is_empty())
    }
}

/// A record together with the vector it was stored under.
#[derive(Debug, Clone)]
struct StoredMemory {
    record: MemoryRecord,
    embedding: Vec<f32>,
}

/// In-process memory manager backed by an embedding service.
#[derive(Clone)]
pub struct VectorMemory {
    entries: Arc<RwLock<Vec<StoredMemory>>>,
    embedder: Arc<dyn EmbeddingService>,
    llm: Option<Arc<dyn LlmClient>>,
}

impl VectorMemory {
    /// Creates an empty memory that stores input text verbatim.
    pub fn new(embedder: Arc<dyn EmbeddingService>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            embedder,
            llm: None,
        }
    }

    /// Enables fact extraction on `add` through `llm`.
    pub fn with_fact_extraction(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Builds a Gemini-backed memory from the provider mapping.
    ///
    /// Both provider blocks must name Gemini and resolve an API key (block key, then
    /// GOOGLE_API_KEY). The LLM block is only used when `config.infer` is set.
    pub fn from_config(config: &MemoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let embedder = GeminiEmbedding::from_config(&EmbedderBlock {
            block: &config.embedder,
            api_key: resolve_api_key(config.embedder.config.api_key.as_deref())?,
        })?;
        let memory = Self::new(Arc::new(embedder));

        if !config.infer {
            return Ok(memory);
        }

        let llm_settings = &config.llm.config;
        let mut llm = GeminiLlm::new(llm_settings.api_key.clone(), llm_settings.model.clone())?;
        if let Some(url) = &llm_settings.base_url {
            llm = llm.with_base_url(url.clone());
        }
        Ok(memory.with_fact_extraction(Arc::new(llm)))
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Calculates cosine similarity between two vectors; 0.0 for empty or zero vectors.
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    /// Texts to store for `text`: extracted facts when an LLM is attached, else `text` itself.
    async fn memories_for(&self, text: &str) -> Result<Vec<String>, anyhow::Error> {
        match &self.llm {
            Some(llm) => facts::extract_facts(llm.as_ref(), text).await,
            None => Ok(vec![text.to_string()]),
        }
    }
}

#[async_trait]
impl MemoryManager for VectorMemory {
    #[instrument(skip(self, text, options), fields(user_id = ?options.user_id, session_id = ?options.session_id))]
    async fn add(&self, text: &str, options: AddOptions) -> Result<Vec<MemoryRecord>, anyhow::Error> {
        let texts = self.memories_for(text).await?;
        if texts.is_empty() {
            info!("Nothing to remember in input");
            return Ok(Vec::new());
        }

        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != texts.len() {
            anyhow::bail!(
                "Embedder returned {} vectors for {} memories",
                embeddings.len(),
                texts.len()
            );
        }

        let created: Vec<StoredMemory> = texts
            .iter()
            .zip(embeddings)
            .map(|(t, embedding)| StoredMemory {
                record: MemoryRecord::new(t.as_str(), &options),
                embedding,
            })
            .collect();
        let records: Vec<MemoryRecord> = created.iter().map(|s| s.record.clone()).collect();

        let mut entries = self.entries.write().await;
        entries.extend(created);
        let total = entries.len();
        drop(entries);

        info!(added = records.len(), total, "Memories written to vector memory");
        Ok(records)
    }

    #[instrument(skip(self, query, options), fields(user_id = ?options.filter.user_id, session_id = ?options.filter.session_id))]
    async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<MemoryRecord>, anyhow::Error> {
        let query_embedding = self.embedder.embed(query).await?;

        let entries = self.entries.read().await;
        let mut scored: Vec<(f32, &StoredMemory)> = entries
            .iter()
            .filter(|s| options.filter.matches(&s.record))
            .map(|s| (Self::cosine_similarity(&query_embedding, &s.embedding), s))
            .filter(|(score, _)| options.threshold.map_or(true, |t| *score >= t))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let results: Vec<MemoryRecord> = scored
            .into_iter()
            .take(options.filter.limit())
            .map(|(score, s)| s.record.clone().with_score(score))
            .collect();

        info!(count = results.len(), "Vector memory search returned");
        Ok(results)
    }

    async fn get_all(&self, filter: MemoryFilter) -> Result<Vec<MemoryRecord>, anyhow::Error> {
        let entries = self.entries.read().await;
        let results: Vec<MemoryRecord> = entries
            .iter()
            .filter(|s| filter.matches(&s.record))
            .take(filter.limit())
            .map(|s| s.record.clone())
            .collect();
        info!(
            user_id = ?filter.user_id,
            count = results.len(),
            "Vector memory get_all returned"
        );
        Ok(results)
    }

    async fn get(&self, id: Uuid) -> Result<Option<MemoryRecord>, anyhow::Error> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|s| s.record.id == id)
            .map(|s| s.record.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, anyhow::Error> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|s| s.record.id != id);
        Ok(entries.len() != before)
    }

    async fn reset(&self) -> Result<(), anyhow::Error> {
        self.entries.write().await.clear();
        info!("Vector memory reset");
        Ok(())
    }
}
