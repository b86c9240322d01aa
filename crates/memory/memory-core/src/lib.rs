//! # Memory Core
//!
//! Core types and traits for memory storage and retrieval.
//!
//! ## Modules
//!
//! - [`types`] - MemoryRecord, AddOptions, SearchOptions, MemoryFilter
//! - [`config`] - MemoryConfig / ProviderConfig, the provider mapping managers are built from
//! - [`manager`] - MemoryManager trait (add, search, get_all, ...)

pub mod config;
pub mod manager;
pub mod types;

pub use config::*;
pub use manager::*;
pub use types::*;
