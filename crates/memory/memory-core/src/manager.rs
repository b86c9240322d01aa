//! # Memory Manager
//!
//! The capability interface the demo driver talks to. Implemented by `memory-inmemory`'s
//! `VectorMemory`; tests substitute their own stand-ins.

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::{AddOptions, MemoryFilter, MemoryRecord, SearchOptions};

/// Stores, embeds and retrieves text memories scoped by user and session.
#[async_trait]
pub trait MemoryManager: Send + Sync {
    /// Stores `text` (or the facts extracted from it) and returns the created records.
    async fn add(&self, text: &str, options: AddOptions) -> Result<Vec<MemoryRecord>, anyhow::Error>;

    /// Returns records in scope ordered by descending similarity to `query`, each with `score` set.
    async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<MemoryRecord>, anyhow::Error>;

    /// Returns records in scope in insertion order, up to the filter's limit.
    async fn get_all(&self, filter: MemoryFilter) -> Result<Vec<MemoryRecord>, anyhow::Error>;

    /// Retrieves one record by id. Returns `None` if not found.
    async fn get(&self, id: Uuid) -> Result<Option<MemoryRecord>, anyhow::Error>;

    /// Deletes one record; returns whether it existed.
    async fn delete(&self, id: Uuid) -> Result<bool, anyhow::Error>;

    /// Removes every record.
    async fn reset(&self) -> Result<(), anyhow::Error>;
}
