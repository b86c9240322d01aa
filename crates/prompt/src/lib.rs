//! # Prompt
//!
//! Turns structured input into the single prompt strings sent to the generation endpoint.
//!
//! ## Format
//!
//! - **Transcript** ([`flatten_messages`]): one `"<Role>: <content>"` line per message, role
//!   capitalized, lines joined by `\n` with no trailing newline.
//! - **Fact extraction** ([`fact_extraction_prompt`]): instruction block plus the input text,
//!   asking the model for `{"facts": [...]}`.
//!
//! ## External interactions
//!
//! - **AI models**: output is sent to the Gemini `generateContent` API by `llm-client`.

use std::fmt;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    /// Capitalized label used in flattened transcripts (`User`, `Assistant`, `System`).
    pub fn label(&self) -> &'static str {
        match self {
            MessageRole::System => "System",
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single chat message: role plus text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Formats this message as one transcript line: `"<Role>: <content>"`.
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.role.label(), self.content)
    }
}

/// Flattens an ordered message list into a single transcript string.
///
/// `[user("Hi")]` becomes `"User: Hi"`; multiple messages are joined with `\n`.
/// No truncation or token budgeting; an empty slice yields an empty string.
pub fn flatten_messages(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(ChatMessage::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Instruction block for extracting standalone facts from user text.
pub const FACT_EXTRACTION_INSTRUCTIONS: &str = "\
You are a personal information organizer. Extract distinct, standalone facts about the user \
from the input below: preferences, personal details, plans, activities, relationships.
Rules:
- Write each fact as a short sentence in the same language as the input.
- Do not invent facts that are not stated.
- If there is nothing worth remembering, return an empty list.
Respond with JSON only, in the form {\"facts\": [\"fact one\", \"fact two\"]}.";

/// Builds the fact-extraction prompt for `text`.
pub fn fact_extraction_prompt(text: &str) -> String {
    format!("{}\n\nInput:\n{}", FACT_EXTRACTION_INSTRUCTIONS, text)
}
