//! Mirror of the service's analysis history.
//!
//! The service owns the store. This cache only holds the last list it was
//! given and decides what the panel shows.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entry::ResultEntry;
use super::input::SubmissionKind;

/// A persisted snapshot of one completed analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SubmissionKind,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub results: Vec<ResultEntry>,
}

impl HistoryEntry {
    /// Submission text cut to `max_chars` characters, with an ellipsis when shortened.
    pub fn input_preview(&self, max_chars: usize) -> String {
        let single_line = self.input.replace(['\r', '\n'], " ");
        if single_line.chars().count() <= max_chars {
            single_line
        } else {
            let cut: String = single_line.chars().take(max_chars).collect();
            format!("{}...", cut.trim_end())
        }
    }

    /// Timestamp formatted for the panel, or the raw value if it does not parse.
    pub fn display_time(&self) -> String {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
        self.timestamp.clone()
    }
}

#[derive(Debug, Clone)]
pub struct HistoryCache {
    entries: Vec<HistoryEntry>,
    display_limit: usize,
}

impl HistoryCache {
    pub fn new(display_limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            display_limit,
        }
    }

    /// Full replace with the list fetched from the store (append order, oldest first).
    pub fn replace(&mut self, entries: Vec<HistoryEntry>) {
        debug!("History refreshed: {} entries in store", entries.len());
        self.entries = entries;
    }

    /// The newest entries, most recent first, capped at the display limit.
    pub fn recent(&self) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(self.display_limit).collect()
    }

    pub fn find(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
