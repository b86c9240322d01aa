//! # memo-cli
//!
//! The demo driver ([`demo`]) and its command line ([`cli`]). The driver is generic over
//! `LlmClient` and `MemoryManager` and writes to any `io::Write`, so it runs unchanged
//! against stand-ins.

pub mod cli;
pub mod demo;

pub use cli::Cli;
pub use demo::{memory_config_from_env, run_demo};
