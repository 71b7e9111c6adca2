// src/services/mod.rs

//! Service layer for the watcher.
//!
//! - Timeline retrieval through a headless browser (`TimelineFetcher`)
//! - History ownership and change detection (`VersionTracker`)
//! - Webhook delivery (`Notifier`)

mod fetcher;
mod notifier;
mod tracker;

pub use fetcher::TimelineFetcher;
pub use notifier::Notifier;
pub use tracker::{ProbeOutcome, VersionTracker, extract_version_items};
