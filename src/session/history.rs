//! Append-only history of dispatched input lines

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One dispatched input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Strictly increasing, never reused (not even after a clear)
    pub sequence: u64,
    /// The raw input exactly as typed
    pub text: String,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    next_sequence: u64,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Record a line, returning its sequence number
    pub fn append(&mut self, text: &str) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(HistoryEntry {
            sequence,
            text: text.to_string(),
            timestamp: Local::now(),
        });
        sequence
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recent `n` entries, oldest first
    pub fn last(&self, n: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Drop every entry; sequence numbering continues where it left off
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
