//! Transcript Accumulator — append-only, ordered collection of finalized
//! utterances. One accumulator per session; it is handed to the feedback
//! generator only once the session has finished.

use serde::{Deserialize, Serialize};

/// Speaker attribution for one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        f.write_str(s)
    }
}

/// One finalized utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

/// Entries in arrival order. No dedup, no reordering.
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    entries: Vec<TranscriptEntry>,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn into_entries(self) -> Vec<TranscriptEntry> {
        self.entries
    }
}
