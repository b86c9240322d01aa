//! Scripted walkthrough: two generation calls, then add / search / get-all against a memory
//! manager. Nothing is caught; the first failing call ends the run with its error.

use std::env;
use std::io::Write;

use anyhow::Result;
use embedding::{EmbeddingConfig, EnvEmbeddingConfig};
use llm_client::{GenerateOptions, LlmClient};
use memory_core::{
    AddOptions, MemoryConfig, MemoryFilter, MemoryManager, MemoryRecord, ProviderConfig,
    ProviderSettings, SearchOptions,
};
use prompt::ChatMessage;
use tracing::info;

/// Memory manager LLM model unless MEMORY_LLM_MODEL is set.
pub const MEMORY_LLM_MODEL: &str = "gemini-pro";

pub const JOKE_PROMPT: &str = "Tell me a joke about memory.";

pub const NO_MEMORIES: &str = "  No relevant memories found.";

fn env_or(var: &str, default: &str) -> String {
    env::var(var)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Memory config for the walkthrough. The embedder block comes from [`EnvEmbeddingConfig`]
/// (validated); the LLM block uses MEMORY_LLM_MODEL with the same key and endpoint.
pub fn memory_config_from_env() -> Result<MemoryConfig> {
    let embed = EnvEmbeddingConfig::from_env()?;
    embed.validate()?;

    let api_key = Some(embed.api_key().to_string());
    let base_url = embed.base_url().map(str::to_string);
    Ok(MemoryConfig {
        llm: ProviderConfig::google(env_or("MEMORY_LLM_MODEL", MEMORY_LLM_MODEL), api_key.clone())
            .with_base_url(base_url.clone()),
        embedder: ProviderConfig {
            provider: embed.provider().to_string(),
            config: ProviderSettings {
                model: embed.model().to_string(),
                api_key,
                base_url,
            },
        },
        infer: true,
    })
}

/// The fixed three-turn conversation used by the chat example.
pub fn chat_script() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user("What is the capital of France?"),
        ChatMessage::assistant("The capital of France is Paris."),
        ChatMessage::user("And what is it famous for?"),
    ]
}

/// One scripted `add`: text plus scope.
pub fn memory_script() -> Vec<(&'static str, AddOptions)> {
    vec![
        (
            "My favorite color is blue.",
            AddOptions::for_user("user123").with_session("session_alpha"),
        ),
        (
            "I live in a city called Techville.",
            AddOptions::for_user("user123").with_session("session_alpha"),
        ),
        (
            "My cat's name is Whiskers and he is 3 years old.",
            AddOptions::for_user("user456").with_metadata("pet_type", "cat"),
        ),
        (
            "I enjoy hiking on weekends.",
            AddOptions::for_user("user123")
                .with_session("session_beta")
                .with_metadata("activity_type", "outdoor"),
        ),
        (
            "Last weekend, I went hiking to Eagle Peak.",
            AddOptions::for_user("user123").with_session("session_beta"),
        ),
    ]
}

/// One scripted search: printed scope label, query, options.
pub fn search_script() -> Vec<(&'static str, &'static str, SearchOptions)> {
    vec![
        (
            "user123, session_alpha",
            "What is my favorite color?",
            SearchOptions::for_user("user123").with_session("session_alpha"),
        ),
        ("user456", "Tell me about my pet.", SearchOptions::for_user("user456")),
        (
            "user123, session_beta",
            "What did I do last weekend?",
            SearchOptions::for_user("user123").with_session("session_beta"),
        ),
    ]
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

/// Prints search hits, or [`NO_MEMORIES`] when there are none.
pub fn write_search_results<W: Write>(out: &mut W, results: &[MemoryRecord]) -> Result<()> {
    if results.is_empty() {
        writeln!(out, "{}", NO_MEMORIES)?;
        return Ok(());
    }
    for res in results {
        let score = res
            .score
            .map(|s| format!("{:.4}", s))
            .unwrap_or_else(|| "N/A".to_string());
        writeln!(
            out,
            "  - Memory: '{}' (Score: {}, ID: {})",
            res.memory, score, res.id
        )?;
    }
    Ok(())
}

async fn generation_examples<L, W>(llm: &L, out: &mut W) -> Result<()>
where
    L: LlmClient + ?Sized,
    W: Write,
{
    let options = GenerateOptions::default();

    writeln!(out, "\n--- Gemini LLM: Text Generation Example ---")?;
    writeln!(out, "Prompt: {}", JOKE_PROMPT)?;
    let joke = llm.generate(JOKE_PROMPT, &options).await?;
    writeln!(out, "Gemini Response: {}", joke)?;

    writeln!(out, "\n--- Gemini LLM: Chat Example ---")?;
    let reply = llm.chat(&chat_script(), &options).await?;
    writeln!(out, "Gemini Chat Response: {}", reply)?;
    Ok(())
}

async fn add_memories<M, W>(memory: &M, out: &mut W) -> Result<()>
where
    M: MemoryManager + ?Sized,
    W: Write,
{
    for (text, options) in memory_script() {
        memory.add(text, options).await?;
    }
    writeln!(out, "Memories added.")?;
    Ok(())
}

async fn search_memories<M, W>(memory: &M, out: &mut W) -> Result<()>
where
    M: MemoryManager + ?Sized,
    W: Write,
{
    writeln!(out, "\n--- Searching Memories ---")?;
    for (scope, query, options) in search_script() {
        writeln!(out, "\nSearching for ({}): '{}'", scope, query)?;
        let results = memory.search(query, options).await?;
        write_search_results(out, &results)?;
    }
    Ok(())
}

async fn list_memories<M, W>(memory: &M, out: &mut W) -> Result<()>
where
    M: MemoryManager + ?Sized,
    W: Write,
{
    writeln!(out, "\n--- Getting All Memories (for a specific user) ---")?;
    let user_mems = memory.get_all(MemoryFilter::for_user("user123")).await?;
    writeln!(out, "All memories for user123 (Total: {}):", user_mems.len())?;
    for mem in &user_mems {
        writeln!(
            out,
            "  - ID: {}, Memory: '{}', Session: {}, Meta: {}",
            mem.id,
            mem.memory,
            or_na(&mem.session_id),
            mem.metadata_json()
        )?;
    }

    writeln!(out, "\n--- Getting All Memories (all users) ---")?;
    let all_mems = memory.get_all(MemoryFilter::all()).await?;
    writeln!(out, "All memories in the system (Total: {}):", all_mems.len())?;
    for mem in &all_mems {
        writeln!(
            out,
            "  - ID: {}, User: {}, Memory: '{}', Session: {}, Meta: {}",
            mem.id,
            or_na(&mem.user_id),
            mem.memory,
            or_na(&mem.session_id),
            mem.metadata_json()
        )?;
    }
    Ok(())
}

/// Runs the whole walkthrough.
///
/// `build_memory` is called after the generation examples, between the
/// "Initializing" and "initialized" lines; its error ends the run like any other.
pub async fn run_demo<L, M, F, W>(llm: &L, build_memory: F, out: &mut W) -> Result<()>
where
    L: LlmClient + ?Sized,
    M: MemoryManager,
    F: FnOnce() -> Result<M>,
    W: Write,
{
    generation_examples(llm, out).await?;

    writeln!(out, "\n--- Adding Memories ---")?;
    writeln!(out, "Initializing memory system with Gemini for LLM and embeddings...")?;
    let memory = build_memory()?;
    writeln!(out, "Memory system initialized successfully.")?;
    info!("Memory system ready");

    add_memories(&memory, out).await?;
    search_memories(&memory, out).await?;
    list_memories(&memory, out).await?;

    writeln!(out, "\n--- Demo Finished ---")?;
    out.flush()?;
    Ok(())
}
