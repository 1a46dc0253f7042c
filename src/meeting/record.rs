//! Conversation Records
//!
//! One record per completed pipeline run, appended to an injectable store.
//! Records are never mutated after they are stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable output of one completed simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub persona_name: String,
    pub transcript: String,
    pub review: String,
    pub personality_analysis: String,
    pub final_pitch: String,
    pub cold_email: String,
}

impl ConversationRecord {
    /// First line of the transcript body, for listings
    pub fn preview(&self, max_chars: usize) -> String {
        let body = self
            .transcript
            .lines()
            .skip(1)
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");

        if body.chars().count() > max_chars {
            let cut: String = body.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            body.to_string()
        }
    }
}

/// Ordered, append-only record log
pub trait RecordStore: Send {
    fn append(&mut self, record: ConversationRecord);

    /// All records in insertion order
    fn records(&self) -> &[ConversationRecord];

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    fn get(&self, id: Uuid) -> Option<&ConversationRecord> {
        self.records().iter().find(|r| r.id == id)
    }
}

/// Process-lifetime store; nothing survives a restart
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Vec<ConversationRecord>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn append(&mut self, record: ConversationRecord) {
        self.records.push(record);
    }

    fn records(&self) -> &[ConversationRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ConversationRecord {
        ConversationRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            persona_name: name.to_string(),
            transcript: format!("Meeting Conversation Start:\n\n{}: Hello\n", name),
            review: "review".to_string(),
            personality_analysis: "analysis".to_string(),
            final_pitch: "pitch".to_string(),
            cold_email: "email".to_string(),
        }
    }

    #[test]
    fn test_store_preserves_insertion_order() {
        let mut store = InMemoryRecordStore::new();
        assert!(store.is_empty());

        store.append(record("Ada"));
        store.append(record("Grace"));

        assert_eq!(store.len(), 2);
        let names: Vec<&str> = store
            .records()
            .iter()
            .map(|r| r.persona_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }

    #[test]
    fn test_get_by_id() {
        let mut store = InMemoryRecordStore::new();
        let first = record("Ada");
        let id = first.id;
        store.append(first);

        assert_eq!(store.get(id).map(|r| r.persona_name.as_str()), Some("Ada"));
        assert!(store.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_preview_skips_header() {
        let rec = record("Ada");
        assert_eq!(rec.preview(80), "Ada: Hello");
        assert_eq!(rec.preview(3), "Ada...");
    }

    #[test]
    fn test_record_serializes_with_all_fields() {
        let rec = record("Ada");
        let json = serde_json::to_value(&rec).unwrap();
        for key in [
            "id",
            "created_at",
            "persona_name",
            "transcript",
            "review",
            "personality_analysis",
            "final_pitch",
            "cold_email",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
