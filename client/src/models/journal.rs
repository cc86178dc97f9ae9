//! Journal entry types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Payload for creating a journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJournalEntry {
    /// Numeric journal phase (1-4)
    pub phase: u8,
    pub content: String,
}

/// A stored journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: i64,
    pub phase: u8,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Group entries by phase, the way the journal view presents them
pub fn group_by_phase(entries: Vec<JournalEntry>) -> BTreeMap<u8, Vec<JournalEntry>> {
    let mut grouped: BTreeMap<u8, Vec<JournalEntry>> = BTreeMap::new();
    for entry in entries {
        grouped.entry(entry.phase).or_default().push(entry);
    }
    grouped
}
