// src/models/mod.rs

//! Data structures shared across the watcher.

pub mod config;
pub mod history;
pub mod message;
pub mod selectors;
pub mod snapshot;

pub use config::{
    Config, FetchConfig, NotifyConfig, ScheduleConfig, StorageConfig, WatcherConfig,
};
pub use history::{HistoryEntry, VersionRecord};
pub use message::MessageChunk;
pub use selectors::TimelineSelectors;
pub use snapshot::{ArticleGroup, ModificationEvent, ParsedSnapshot};
