// src/models/message.rs

//! Renderable notification units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One size-bounded renderable unit of a notification message.
///
/// Continuation chunks of the same report share `url`, `color` and
/// `timestamp`; only the title gains a continuation suffix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageChunk {
    /// Chunk title, suffixed on continuation chunks
    pub title: String,

    /// Link target of the chunk (the snapshot's date URL)
    pub url: String,

    /// Accent color of the rendered message
    pub color: u32,

    /// Report timestamp, shared by all chunks of one report
    pub timestamp: DateTime<Utc>,

    /// Rendered body, bounded by the configured chunk size
    pub body: String,
}

impl MessageChunk {
    /// Body length in characters, the unit the chunk bound is counted in.
    pub fn body_chars(&self) -> usize {
        self.body.chars().count()
    }
}
