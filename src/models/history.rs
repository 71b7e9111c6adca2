// src/models/history.rs

//! Probe history data structures.
//!
//! The history is an append-only audit trail: one entry per hourly probe,
//! each holding the version items observed at that capture time. Entries
//! are never mutated or removed once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One version item observed in the timeline's current-year section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionRecord {
    /// Capture time of the probe that observed this item
    pub captured_at: DateTime<Utc>,

    /// Whether the item was flagged as the current version
    pub is_current_version: bool,

    /// Resolved date-link URL, empty when the item has no date link
    #[serde(default)]
    pub date_link: String,

    /// Inner markup of the item, kept verbatim for audit and debugging
    pub raw_fragment: String,
}

/// One probe's worth of observed version items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Probe time; strictly increasing across the history
    pub log_date: DateTime<Utc>,

    /// Version items in timeline order
    pub version_items: Vec<VersionRecord>,
}

impl HistoryEntry {
    /// Number of version items observed by this probe.
    pub fn item_count(&self) -> usize {
        self.version_items.len()
    }
}
