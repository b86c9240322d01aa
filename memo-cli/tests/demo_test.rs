//! Driver tests: [`memo_cli::run_demo`] against stub generation clients and stub memory
//! managers, plus end-to-end runs over `VectorMemory` with a table embedder, with and without fact
//! extraction.
//! Output is captured in a `Vec<u8>`; no network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use embedding::EmbeddingService;
use llm_client::{GenerateOptions, LlmClient};
use memo_cli::demo::memory_script;
use memo_cli::run_demo;
use memory_core::{AddOptions, MemoryFilter, MemoryManager, MemoryRecord, SearchOptions};
use memory_inmemory::VectorMemory;
use prompt::flatten_messages;
use uuid::Uuid;

/// Returns a fixed reply and records every prompt.
struct StubLlm {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl StubLlm {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmClient for StubLlm {
    async fn generate(&self, prompt: &str, _options: &GenerateOptions) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

struct FailingLlm;

#[async_trait]
impl LlmClient for FailingLlm {
    async fn generate(&self, _prompt: &str, _options: &GenerateOptions) -> anyhow::Result<String> {
        anyhow::bail!("Gemini API error (503 Service Unavailable): overloaded")
    }
}

/// Memory manager whose search returns a preset list (possibly empty); records adds.
#[derive(Default)]
struct StubMemory {
    search_results: Vec<MemoryRecord>,
    added: Mutex<Vec<(String, AddOptions)>>,
    searches: Mutex<Vec<(String, SearchOptions)>>,
}

#[async_trait]
impl MemoryManager for StubMemory {
    async fn add(&self, text: &str, options: AddOptions) -> anyhow::Result<Vec<MemoryRecord>> {
        let record = MemoryRecord::new(text, &options);
        self.added.lock().unwrap().push((text.to_string(), options));
        Ok(vec![record])
    }

    async fn search(&self, query: &str, options: SearchOptions) -> anyhow::Result<Vec<MemoryRecord>> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), options));
        Ok(self.search_results.clone())
    }

    async fn get_all(&self, filter: MemoryFilter) -> anyhow::Result<Vec<MemoryRecord>> {
        Ok(self
            .added
            .lock()
            .unwrap()
            .iter()
            .map(|(t, o)| MemoryRecord::new(t.as_str(), o))
            .filter(|r| filter.matches(r))
            .collect())
    }

    async fn get(&self, _id: Uuid) -> anyhow::Result<Option<MemoryRecord>> {
        Ok(None)
    }

    async fn delete(&self, _id: Uuid) -> anyhow::Result<bool> {
        Ok(false)
    }

    async fn reset(&self) -> anyhow::Result<()> {
        self.added.lock().unwrap().clear();
        Ok(())
    }
}

/// Lets a test keep a handle on the stub after `run_demo` takes ownership of the manager.
struct Shared(Arc<StubMemory>);

#[async_trait]
impl MemoryManager for Shared {
    async fn add(&self, text: &str, options: AddOptions) -> anyhow::Result<Vec<MemoryRecord>> {
        self.0.add(text, options).await
    }
    async fn search(&self, query: &str, options: SearchOptions) -> anyhow::Result<Vec<MemoryRecord>> {
        self.0.search(query, options).await
    }
    async fn get_all(&self, filter: MemoryFilter) -> anyhow::Result<Vec<MemoryRecord>> {
        self.0.get_all(filter).await
    }
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<MemoryRecord>> {
        self.0.get(id).await
    }
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        self.0.delete(id).await
    }
    async fn reset(&self) -> anyhow::Result<()> {
        self.0.reset().await
    }
}

async fn run_with(llm: &StubLlm, memory: Arc<StubMemory>) -> String {
    let mut out = Vec::new();
    run_demo(llm, || Ok(Shared(memory)), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

/// **Test: The joke line contains exactly the stub's reply.**
#[tokio::test]
async fn joke_line_uses_generation_text() {
    let llm = StubLlm::new("A fixed punchline.");
    let output = run_with(&llm, Arc::new(StubMemory::default())).await;

    assert!(output.contains("Prompt: Tell me a joke about memory.\n"));
    assert!(output.contains("\nGemini Response: A fixed punchline.\n"));
    assert!(output.contains("\nGemini Chat Response: A fixed punchline.\n"));
    assert!(output.ends_with("\n--- Demo Finished ---\n"));
}

/// **Test: The joke prompt is sent verbatim; the chat prompt is the flattened transcript.**
#[tokio::test]
async fn prompts_sent_to_generation_client() {
    let llm = StubLlm::new("ok");
    run_with(&llm, Arc::new(StubMemory::default())).await;

    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], "Tell me a joke about memory.");
    assert_eq!(prompts[1], flatten_messages(&memo_cli::demo::chat_script()));
    assert_eq!(
        prompts[1],
        "User: What is the capital of France?\n\
         Assistant: The capital of France is Paris.\n\
         User: And what is it famous for?"
    );
}

/// **Test: Empty search results print the notice instead of result lines.**
#[tokio::test]
async fn empty_search_prints_no_relevant_memories() {
    let llm = StubLlm::new("ok");
    let output = run_with(&llm, Arc::new(StubMemory::default())).await;

    assert_eq!(output.matches("  No relevant memories found.").count(), 3);
    assert!(!output.contains("  - Memory:"));
    assert!(output.contains("\nSearching for (user123, session_alpha): 'What is my favorite color?'\n"));
    assert!(output.contains("\nSearching for (user456): 'Tell me about my pet.'\n"));
    assert!(output.contains("\nSearching for (user123, session_beta): 'What did I do last weekend?'\n"));
}

/// **Test: Non-empty results print one line per hit with a 4-decimal score.**
#[tokio::test]
async fn search_results_are_listed() {
    let hit = MemoryRecord::new("My favorite color is blue.", &AddOptions::for_user("user123"))
        .with_score(0.87654);
    let memory = Arc::new(StubMemory {
        search_results: vec![hit.clone()],
        ..StubMemory::default()
    });
    let output = run_with(&StubLlm::new("ok"), memory).await;

    let line = format!(
        "  - Memory: 'My favorite color is blue.' (Score: 0.8765, ID: {})",
        hit.id
    );
    assert_eq!(output.matches(&line).count(), 3);
    assert!(!output.contains("No relevant memories found."));
}

/// **Test: The five scripted adds and three searches carry the right scopes.**
#[tokio::test]
async fn scripted_calls_reach_memory_manager() {
    let memory = Arc::new(StubMemory::default());
    let output = run_with(&StubLlm::new("ok"), memory.clone()).await;

    let added = memory.added.lock().unwrap();
    assert_eq!(added.len(), 5);
    assert_eq!(added[2].0, "My cat's name is Whiskers and he is 3 years old.");
    assert_eq!(added[2].1, AddOptions::for_user("user456").with_metadata("pet_type", "cat"));
    assert_eq!(
        added[3].1,
        AddOptions::for_user("user123")
            .with_session("session_beta")
            .with_metadata("activity_type", "outdoor")
    );

    let searches = memory.searches.lock().unwrap();
    assert_eq!(searches.len(), 3);
    assert_eq!(searches[1].1, SearchOptions::for_user("user456"));

    assert!(output.contains("Memories added.\n"));
    assert!(output.contains("All memories for user123 (Total: 4):\n"));
    assert!(output.contains("All memories in the system (Total: 5):\n"));
    assert!(output.contains(
        "Memory: 'My cat's name is Whiskers and he is 3 years old.', Session: N/A, Meta: {\"pet_type\":\"cat\"}"
    ));
    assert!(output.contains("User: user456, Memory: 'My cat's name is Whiskers"));
    assert!(output.contains("Session: session_alpha, Meta: {}"));
}

/// **Test: A generation failure ends the run; the memory manager is never built.**
#[tokio::test]
async fn generation_error_propagates() {
    let built = AtomicBool::new(false);
    let mut out = Vec::new();
    let err = run_demo(
        &FailingLlm,
        || {
            built.store(true, Ordering::SeqCst);
            Ok(StubMemory::default())
        },
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("503"));
    assert!(!built.load(Ordering::SeqCst));
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("Prompt: Tell me a joke about memory."));
    assert!(!output.contains("Gemini Response:"));
}

/// **Test: A memory construction failure ends the run after the initializing line.**
#[tokio::test]
async fn memory_construction_error_propagates() {
    let mut out = Vec::new();
    let err = run_demo(
        &StubLlm::new("ok"),
        || -> anyhow::Result<StubMemory> {
            Err(memo_core::ConfigError::MissingApiKey {
                var: "GOOGLE_API_KEY".into(),
            }
            .into())
        },
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(err.downcast_ref::<memo_core::ConfigError>().is_some());
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("Initializing memory system"));
    assert!(!output.contains("initialized successfully"));
    assert!(!output.contains("Memories added."));
}

/// Embedder over a fixed table; unknown text maps to a zero vector.
struct TableEmbedder(HashMap<&'static str, Vec<f32>>);

#[async_trait]
impl EmbeddingService for TableEmbedder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        Ok(self.0.get(text).cloned().unwrap_or_else(|| vec![0.0; 3]))
    }

    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for t in texts {
            out.push(self.embed(t).await?);
        }
        Ok(out)
    }
}

fn script_embedder() -> Arc<TableEmbedder> {
    Arc::new(TableEmbedder(HashMap::from([
        ("My favorite color is blue.", vec![1.0, 0.0, 0.0]),
        ("I live in a city called Techville.", vec![0.0, 1.0, 0.0]),
        ("My cat's name is Whiskers and he is 3 years old.", vec![0.0, 0.0, 1.0]),
        ("I enjoy hiking on weekends.", vec![0.2, 0.2, 0.9]),
        ("Last weekend, I went hiking to Eagle Peak.", vec![0.1, 0.1, 1.0]),
        ("What is my favorite color?", vec![0.9, 0.2, 0.0]),
        ("Tell me about my pet.", vec![0.0, 0.1, 0.9]),
        ("What did I do last weekend?", vec![0.05, 0.05, 1.0]),
    ])))
}

/// Best hit per scoped search comes first; totals match the script.
fn assert_walkthrough_output(output: &str) {
    let color = output.find("  - Memory: 'My favorite color is blue.' (Score: 0.9").unwrap();
    let city = output.find("  - Memory: 'I live in a city called Techville.'").unwrap();
    assert!(color < city);
    assert!(output.contains("  - Memory: 'My cat's name is Whiskers and he is 3 years old.'"));
    let peak = output.find("  - Memory: 'Last weekend, I went hiking to Eagle Peak.'").unwrap();
    let hiking = output.find("  - Memory: 'I enjoy hiking on weekends.'").unwrap();
    assert!(peak < hiking);
    assert!(output.contains("All memories for user123 (Total: 4):"));
    assert!(output.contains("All memories in the system (Total: 5):"));
    assert!(!output.contains("No relevant memories found."));
}

/// **Test: End to end over VectorMemory: the best hit per scoped search comes first.**
#[tokio::test]
async fn end_to_end_with_vector_memory() {
    let llm = StubLlm::new("ok");
    let mut out = Vec::new();
    run_demo(&llm, || Ok(VectorMemory::new(script_embedder())), &mut out)
        .await
        .unwrap();
    assert_walkthrough_output(&String::from_utf8(out).unwrap());
}

/// Fact-extraction LLM: answers with the scripted sentence found in the prompt, wrapped in a
/// code fence the way chat models often reply. Records the options of every call.
#[derive(Default)]
struct FactLlm {
    options: Mutex<Vec<GenerateOptions>>,
}

#[async_trait]
impl LlmClient for FactLlm {
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> anyhow::Result<String> {
        self.options.lock().unwrap().push(options.clone());
        let fact = memory_script()
            .into_iter()
            .map(|(text, _)| text)
            .find(|text| prompt.ends_with(text))
            .ok_or_else(|| anyhow::anyhow!("unexpected prompt: {}", prompt))?;
        Ok(format!("```json\n{{\"facts\": [\"{}\"]}}\n```", fact))
    }
}

/// **Test: With fact extraction on, as the binary runs it, the walkthrough completes.**
#[tokio::test]
async fn end_to_end_with_fact_extraction() {
    let fact_llm = Arc::new(FactLlm::default());
    let llm = StubLlm::new("ok");
    let mut out = Vec::new();
    run_demo(
        &llm,
        || Ok(VectorMemory::new(script_embedder()).with_fact_extraction(fact_llm.clone())),
        &mut out,
    )
    .await
    .unwrap();
    assert_walkthrough_output(&String::from_utf8(out).unwrap());

    let calls = fact_llm.options.lock().unwrap();
    assert_eq!(calls.len(), memory_script().len());
    assert!(calls.iter().all(|o| *o == GenerateOptions::default()));
}
