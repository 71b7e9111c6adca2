// src/pipeline/probe.rs

//! Hourly change-probe pipeline: fetch, probe, alert on growth.

use chrono::{Datelike, Local, Utc};

use crate::error::Result;
use crate::models::Config;
use crate::services::{Notifier, ProbeOutcome, TimelineFetcher, VersionTracker};
use crate::utils;

/// Run one probe tick against today's timeline.
///
/// The tracker appends and persists inside its own critical section; this
/// function only fetches, forwards and sends the one-line alert when the
/// version count grew.
pub async fn run_probe(
    config: &Config,
    fetcher: &TimelineFetcher,
    tracker: &VersionTracker,
    notifier: &Notifier,
) -> Result<()> {
    let today = Local::now().date_naive();
    let url = utils::timeline_url(&config.watcher.timeline_url, today)?;
    log::info!("Probing timeline: {}", url);
    let html = fetcher.fetch(&url).await?;

    match tracker.probe(&html, today.year(), Utc::now()).await? {
        ProbeOutcome::Empty => {
            log::info!("Probe found no version items; history left untouched");
        }
        ProbeOutcome::Recorded {
            item_count,
            previous_count,
            notify,
            persisted,
        } => {
            log::info!(
                "Probe recorded {} version item(s), previous {:?}, persisted {}",
                item_count,
                previous_count,
                persisted
            );
            if notify {
                let text = format!(
                    "🔔 Nouvelle version du {} détectée : {} versions listées cette année, contre {} au relevé précédent.",
                    config.watcher.code_name,
                    item_count,
                    previous_count.unwrap_or(0)
                );
                notifier.send_text(&text).await?;
            }
        }
    }

    Ok(())
}
