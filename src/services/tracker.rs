// src/services/tracker.rs

//! Version-history tracker.
//!
//! One probe extracts the version items listed under the current year of
//! the timeline, appends them as a new history entry and decides whether
//! a new version was published. Detection compares item counts only: a
//! version item replaced in place without changing the total is not
//! detected. That limitation is deliberate and documented; richer
//! content-level diffing would change the notification semantics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use scraper::Html;
use tokio::sync::Mutex;
use url::Url;

use crate::error::Result;
use crate::models::{HistoryEntry, TimelineSelectors, VersionRecord};
use crate::storage::HistoryStorage;
use crate::utils::{self, dom};

/// Outcome of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// No version items were found. The history is left untouched so a
    /// transient scrape failure cannot corrupt it with an empty entry.
    Empty,

    /// A new entry was appended.
    Recorded {
        /// Version items observed by this probe
        item_count: usize,
        /// Item count of the previous entry, if any
        previous_count: Option<usize>,
        /// Whether the count strictly increased over the previous entry
        notify: bool,
        /// Whether the history reached disk
        persisted: bool,
    },
}

/// Extract every version item under the timeline section of `year`.
///
/// Items outside that year's section are ignored. Each record captures
/// the current-version flag, the resolved date link (empty when the item
/// has no link) and the item's inner markup verbatim for audit.
pub fn extract_version_items(
    html: &str,
    selectors: &TimelineSelectors,
    base_url: &str,
    year: i32,
    captured_at: DateTime<Utc>,
) -> Result<Vec<VersionRecord>> {
    let year_section = dom::parse_selector(&selectors.year_section)?;
    let version_item = dom::parse_selector(&selectors.version_item)?;
    let date_link = dom::parse_selector(&selectors.item_date_link)?;
    let base = Url::parse(base_url)?;

    let doc = Html::parse_document(html);
    let root = doc.root_element();
    let year_label = year.to_string();

    let mut records = Vec::new();
    for section in dom::select_all(root, &year_section) {
        if dom::attr(section, &selectors.year_attr) != Some(year_label.as_str()) {
            continue;
        }
        for item in dom::select_all(section, &version_item) {
            let link = dom::select_first(item, &date_link)
                .and_then(|a| dom::attr(a, "href"))
                .map(|href| utils::resolve_url(&base, href))
                .unwrap_or_default();
            records.push(VersionRecord {
                captured_at,
                is_current_version: dom::has_class(item, &selectors.current_class),
                date_link: link,
                raw_fragment: dom::inner_html(item),
            });
        }
    }

    Ok(records)
}

/// Owner of the in-memory history and its persistence.
///
/// The history is shared between the hourly probe and any one-shot
/// commands; the compare-append-persist sequence runs under one lock so
/// overlapping ticks cannot interleave.
pub struct VersionTracker {
    history: Mutex<Vec<HistoryEntry>>,
    storage: Arc<dyn HistoryStorage>,
    selectors: TimelineSelectors,
    base_url: String,
}

impl VersionTracker {
    /// Load the persisted history and build a tracker over it.
    ///
    /// An unreadable history degrades to an empty one: the audit trail
    /// restarts rather than blocking the watcher.
    pub async fn load(
        storage: Arc<dyn HistoryStorage>,
        selectors: TimelineSelectors,
        base_url: impl Into<String>,
    ) -> Self {
        let history = match storage.load().await {
            Ok(entries) => {
                log::info!("Loaded {} history entries", entries.len());
                entries
            }
            Err(e) => {
                log::warn!("History load failed: {}. Starting with empty history.", e);
                Vec::new()
            }
        };

        Self {
            history: Mutex::new(history),
            storage,
            selectors,
            base_url: base_url.into(),
        }
    }

    /// Number of entries currently held in memory.
    pub async fn entry_count(&self) -> usize {
        self.history.lock().await.len()
    }

    /// Item count of the most recent entry, if any.
    pub async fn last_item_count(&self) -> Option<usize> {
        self.history.lock().await.last().map(HistoryEntry::item_count)
    }

    /// Run one probe over fetched markup.
    ///
    /// Zero extracted items abort the probe. Otherwise the new entry is
    /// always appended and persisted, whatever the notify outcome; a
    /// persistence failure keeps the entry in memory so the next
    /// successful save carries it along.
    pub async fn probe(
        &self,
        html: &str,
        year: i32,
        captured_at: DateTime<Utc>,
    ) -> Result<ProbeOutcome> {
        let version_items =
            extract_version_items(html, &self.selectors, &self.base_url, year, captured_at)?;
        if version_items.is_empty() {
            return Ok(ProbeOutcome::Empty);
        }
        let item_count = version_items.len();

        // Compare, append and persist under one lock so concurrent ticks
        // cannot interleave their read-modify-persist sequences.
        let mut history = self.history.lock().await;
        let previous_count = history.last().map(HistoryEntry::item_count);
        let notify = previous_count.is_some_and(|previous| previous < item_count);

        history.push(HistoryEntry {
            log_date: captured_at,
            version_items,
        });

        let persisted = match self.storage.save(&history).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("History save failed: {}. Keeping the entry in memory.", e);
                false
            }
        };

        Ok(ProbeOutcome::Recorded {
            item_count,
            previous_count,
            notify,
            persisted,
        })
    }
}
