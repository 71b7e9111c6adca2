// src/storage/mod.rs

//! Persistence of the probe history.
//!
//! The history lives in a single JSON file:
//!
//! ```text
//! storage/
//! └── history.json          # Pretty-printed array of history entries
//! ```
//!
//! Every save rewrites the whole file; there is no incremental on-disk
//! format. A missing file reads as an empty history.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::HistoryEntry;

// Re-export for convenience
pub use local::LocalHistoryStorage;

/// Trait for history storage backends.
#[async_trait]
pub trait HistoryStorage: Send + Sync {
    /// Load the full history. A missing backing file yields an empty
    /// history; an unreadable one is an error the caller may degrade.
    async fn load(&self) -> Result<Vec<HistoryEntry>>;

    /// Persist the full history, replacing any previous contents.
    async fn save(&self, entries: &[HistoryEntry]) -> Result<()>;
}
