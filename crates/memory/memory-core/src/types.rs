//! # Core Types
//!
//! ## MemoryRecord
//!
//! One stored memory: text, optional user/session scope, free-form metadata and, on search
//! results only, a similarity score.
//!
//! ## AddOptions / SearchOptions / MemoryFilter
//!
//! Scope and limits passed to [`MemoryManager`](crate::MemoryManager) operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Free-form metadata attached to a memory (JSON object).
pub type Metadata = Map<String, Value>;

/// Default number of records returned by `search` and `get_all`.
pub const DEFAULT_LIMIT: usize = 100;

/// A single stored memory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    /// Unique identifier
    pub id: Uuid,
    /// The remembered text
    pub memory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Similarity to the query; only set on search results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl MemoryRecord {
    /// Creates a record with a fresh UUID, scoped by `options`.
    pub fn new(memory: impl Into<String>, options: &AddOptions) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            memory: memory.into(),
            user_id: options.user_id.clone(),
            session_id: options.session_id.clone(),
            metadata: options.metadata.clone(),
            created_at: now,
            updated_at: now,
            score: None,
        }
    }

    /// Returns a copy carrying `score`.
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    /// Metadata rendered as compact JSON (`{}` when empty).
    pub fn metadata_json(&self) -> String {
        Value::Object(self.metadata.clone()).to_string()
    }
}

/// Scope and metadata for `add`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddOptions {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub metadata: Metadata,
}

impl AddOptions {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Scope filter for `get_all` (and the scope part of [`SearchOptions`]).
///
/// Every set field must match; unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryFilter {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    /// Maximum number of records; [`DEFAULT_LIMIT`] when unset.
    pub limit: Option<usize>,
}

impl MemoryFilter {
    /// No scope: every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// True when `record` lies inside this scope.
    pub fn matches(&self, record: &MemoryRecord) -> bool {
        fn field_matches(want: &Option<String>, have: &Option<String>) -> bool {
            match want {
                Some(w) => have.as_deref() == Some(w.as_str()),
                None => true,
            }
        }
        field_matches(&self.user_id, &record.user_id)
            && field_matches(&self.session_id, &record.session_id)
    }
}

/// Scope, limit and score threshold for `search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub filter: MemoryFilter,
    /// Results scoring below this are dropped.
    pub threshold: Option<f32>,
}

impl SearchOptions {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            filter: MemoryFilter::for_user(user_id),
            threshold: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.filter = self.filter.with_session(session_id);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.filter = self.filter.with_limit(limit);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_record_takes_scope_from_options() {
        let options = AddOptions::for_user("user456").with_metadata("pet_type", "cat");
        let record = MemoryRecord::new("My cat's name is Whiskers.", &options);
        assert_eq!(record.user_id.as_deref(), Some("user456"));
        assert!(record.session_id.is_none());
        assert_eq!(record.metadata.get("pet_type"), Some(&json!("cat")));
        assert!(record.score.is_none());
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn metadata_json_renders_empty_and_filled() {
        let empty = MemoryRecord::new("x", &AddOptions::default());
        assert_eq!(empty.metadata_json(), "{}");
        let filled = MemoryRecord::new(
            "x",
            &AddOptions::default().with_metadata("activity_type", "outdoor"),
        );
        assert_eq!(filled.metadata_json(), r#"{"activity_type":"outdoor"}"#);
    }

    #[test]
    fn filter_matches_all_set_fields() {
        let record = MemoryRecord::new("x", &AddOptions::for_user("u1").with_session("s1"));
        assert!(MemoryFilter::all().matches(&record));
        assert!(MemoryFilter::for_user("u1").matches(&record));
        assert!(MemoryFilter::for_user("u1").with_session("s1").matches(&record));
        assert!(!MemoryFilter::for_user("u1").with_session("s2").matches(&record));
        assert!(!MemoryFilter::for_user("u2").matches(&record));

        let unscoped = MemoryRecord::new("y", &AddOptions::default());
        assert!(!MemoryFilter::for_user("u1").matches(&unscoped));
    }

    #[test]
    fn limits_default_to_100() {
        assert_eq!(MemoryFilter::all().limit(), DEFAULT_LIMIT);
        assert_eq!(SearchOptions::for_user("u").with_limit(3).filter.limit(), 3);
    }

    #[test]
    fn record_serializes_without_empty_optionals() {
        let record = MemoryRecord::new("x", &AddOptions::default());
        let v = serde_json::to_value(&record).unwrap();
        assert!(v.get("user_id").is_none());
        assert!(v.get("score").is_none());
        assert_eq!(v["metadata"], json!({}));
    }
}
