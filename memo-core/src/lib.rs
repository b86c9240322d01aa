//! # memo-core
//!
//! Pieces shared by every crate in the workspace: the [`ConfigError`] raised at construction
//! time, API key resolution ([`resolve_api_key`]) and tracing initialization ([`init_tracing`]).

pub mod api_key;
pub mod error;
pub mod logger;

pub use api_key::{resolve_api_key, GOOGLE_API_KEY_VAR};
pub use error::ConfigError;
pub use logger::init_tracing;
