// src/pipeline/report.rs

//! Daily report pipeline: fetch, parse, format, send.

use chrono::{NaiveDate, Utc};

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::format::format_snapshot;
use crate::pipeline::parse::{ParseOutcome, parse_snapshot};
use crate::services::{Notifier, TimelineFetcher};
use crate::utils;

/// Run one report tick for `reference_date`.
///
/// The date is a parameter rather than the wall clock so one-shot runs
/// and backfills can target any day. Null-ish parse outcomes degrade to
/// the fixed no-changes notice; only fetch and transport failures abort
/// the tick.
pub async fn run_report(
    config: &Config,
    fetcher: &TimelineFetcher,
    notifier: &Notifier,
    reference_date: NaiveDate,
) -> Result<()> {
    let url = utils::timeline_url(&config.watcher.timeline_url, reference_date)?;
    log::info!("Fetching timeline: {}", url);
    let html = fetcher.fetch(&url).await?;

    let outcome = parse_snapshot(
        &html,
        reference_date,
        &config.selectors,
        &config.watcher.base_url,
    )?;
    let snapshot = match outcome {
        ParseOutcome::NoVersionForDate => {
            log::info!(
                "No version published for {}",
                utils::format_date_fr(reference_date)
            );
            return send_no_changes(config, notifier, reference_date).await;
        }
        ParseOutcome::MissingContainer => {
            log::warn!("Marker matched but the current-version container is missing");
            return send_no_changes(config, notifier, reference_date).await;
        }
        ParseOutcome::Parsed(snapshot) if snapshot.is_empty() => {
            log::info!("Version published but no modification events extracted");
            return send_no_changes(config, notifier, reference_date).await;
        }
        ParseOutcome::Parsed(snapshot) => snapshot,
    };

    let date_label = if snapshot.date.is_empty() {
        utils::format_date_fr(reference_date)
    } else {
        snapshot.date.clone()
    };
    let title = format!("⚖️ {} : {}", config.watcher.code_name, date_label);

    let chunks = format_snapshot(
        &snapshot,
        &title,
        config.notify.embed_color,
        Utc::now(),
        config.notify.max_chunk_chars,
    );

    let mention = owner_mention(&config.notify.owner_id);
    let delivered = notifier.send_report(&chunks, mention.as_deref()).await;
    log::info!(
        "Report for {} sent: {}/{} chunks, {} modification(s)",
        utils::format_date_fr(reference_date),
        delivered,
        chunks.len(),
        snapshot.modifications.len()
    );

    Ok(())
}

/// Mention string for the configured owner, if any.
fn owner_mention(owner_id: &str) -> Option<String> {
    (!owner_id.is_empty()).then(|| format!("<@{owner_id}>"))
}

/// Send the fixed notice for a day without modifications.
async fn send_no_changes(
    config: &Config,
    notifier: &Notifier,
    reference_date: NaiveDate,
) -> Result<()> {
    let text = format!(
        "📭 {} : aucune modification publiée le {}.",
        config.watcher.code_name,
        utils::format_date_fr(reference_date)
    );
    notifier.send_text(&text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_mention_formats_id() {
        assert_eq!(owner_mention("42"), Some("<@42>".to_string()));
        assert_eq!(owner_mention(""), None);
    }
}
