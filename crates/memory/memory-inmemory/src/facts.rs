//! LLM fact extraction for `add`.

use llm_client::{GenerateOptions, LlmClient};
use prompt::fact_extraction_prompt;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct FactList {
    facts: Vec<String>,
}

/// Parses a `{"facts": [...]}` reply, tolerating code fences or prose around the object.
///
/// Returns `None` when no JSON object with a `facts` list can be decoded. Blank facts are dropped.
pub fn parse_facts(reply: &str) -> Option<Vec<String>> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    let list: FactList = serde_json::from_str(&reply[start..=end]).ok()?;
    Some(
        list.facts
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect(),
    )
}

/// Asks `llm` for the facts in `text`. LLM errors propagate; an unparseable reply falls back
/// to storing `text` as-is.
///
/// No JSON response mode is requested: not every Gemini model accepts one, and the prompt
/// already asks for the object.
pub(crate) async fn extract_facts(
    llm: &dyn LlmClient,
    text: &str,
) -> Result<Vec<String>, anyhow::Error> {
    let reply = llm
        .generate(&fact_extraction_prompt(text), &GenerateOptions::default())
        .await?;

    match parse_facts(&reply) {
        Some(facts) => {
            info!(count = facts.len(), "Facts extracted");
            Ok(facts)
        }
        None => {
            warn!(reply_len = reply.len(), "Fact extraction reply is not JSON; storing raw text");
            Ok(vec![text.to_string()])
        }
    }
}
