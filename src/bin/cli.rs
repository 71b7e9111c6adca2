// src/bin/cli.rs

//! legiwatch CLI
//!
//! Watches a Légifrance code timeline: daily modification reports and
//! hourly probes for newly published versions.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use legiwatch::{
    error::Result,
    models::Config,
    pipeline,
    services::{Notifier, TimelineFetcher, VersionTracker},
    storage::{HistoryStorage, LocalHistoryStorage},
    utils,
};

/// legiwatch - Légifrance code-modification watcher
#[derive(Parser, Debug)]
#[command(
    name = "legiwatch",
    version,
    about = "Légifrance code-modification watcher"
)]
struct Cli {
    /// Path to storage directory containing config and history files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the daily and hourly schedules until interrupted
    Watch,

    /// Send one full report now
    Report {
        /// Reference date DD/MM/YYYY (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Run one change probe now
    Probe,

    /// Validate the configuration file
    Validate,

    /// Show configuration and history summary
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the tracker over the persisted history.
async fn load_tracker(storage_dir: &Path, config: &Config) -> VersionTracker {
    let storage: Arc<dyn HistoryStorage> = Arc::new(LocalHistoryStorage::new(
        storage_dir,
        &config.storage.history_file,
    ));
    VersionTracker::load(
        storage,
        config.selectors.clone(),
        config.watcher.base_url.clone(),
    )
    .await
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("legiwatch starting...");

    let config_path = cli.storage_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);
    config.apply_env();

    log::info!("Loaded configuration from {}", cli.storage_dir.display());

    match cli.command {
        Command::Watch => {
            let fetcher = TimelineFetcher::new(config.fetch.clone());
            let notifier = Notifier::new(config.notify.webhook_url.clone())?;
            if notifier.is_console() {
                log::warn!("No webhook URL configured; messages go to the console");
            }
            let tracker = load_tracker(&cli.storage_dir, &config).await;

            pipeline::run_watch(config, fetcher, tracker, notifier).await?;
        }

        Command::Report { date } => {
            let reference_date = match date {
                Some(raw) => utils::parse_date_fr(&raw)?,
                None => Local::now().date_naive(),
            };

            let fetcher = TimelineFetcher::new(config.fetch.clone());
            let notifier = Notifier::new(config.notify.webhook_url.clone())?;
            pipeline::run_report(&config, &fetcher, &notifier, reference_date).await?;

            log::info!("Report complete!");
        }

        Command::Probe => {
            let fetcher = TimelineFetcher::new(config.fetch.clone());
            let notifier = Notifier::new(config.notify.webhook_url.clone())?;
            let tracker = load_tracker(&cli.storage_dir, &config).await;

            pipeline::run_probe(&config, &fetcher, &tracker, &notifier).await?;

            log::info!("Probe complete!");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (watcher, fetch, notify, schedule, selectors)");

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!("Tracked code: {}", config.watcher.code_name);
            log::info!("Timeline: {}", config.watcher.timeline_url);
            log::info!(
                "Webhook: {}",
                if config.notify.webhook_url.is_empty() {
                    "console mode"
                } else {
                    "configured"
                }
            );

            let storage =
                LocalHistoryStorage::new(&cli.storage_dir, &config.storage.history_file);
            if storage.path().exists() {
                match storage.load().await {
                    Ok(history) => {
                        log::info!("History: {} entries", history.len());
                        if let Some(last) = history.last() {
                            log::info!(
                                "Last probe: {} with {} version item(s)",
                                last.log_date,
                                last.item_count()
                            );
                        }
                    }
                    Err(e) => log::warn!("History unreadable: {}", e),
                }
            } else {
                log::info!("No history recorded yet.");
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
