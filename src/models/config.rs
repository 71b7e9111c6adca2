// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::TimelineSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tracked code and timeline location
    #[serde(default)]
    pub watcher: WatcherConfig,

    /// Headless-browser fetch behavior
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Notification transport settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Daily and hourly trigger times (local clock)
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// History persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Timeline markup selectors
    #[serde(default)]
    pub selectors: TimelineSelectors,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return defaults if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply environment overrides for deployment-provided secrets.
    pub fn apply_env(&mut self) {
        if let Ok(webhook) = std::env::var("LEGIWATCH_WEBHOOK_URL") {
            if !webhook.trim().is_empty() {
                self.notify.webhook_url = webhook;
            }
        }
        if let Ok(owner) = std::env::var("LEGIWATCH_OWNER_ID") {
            if !owner.trim().is_empty() {
                self.notify.owner_id = owner;
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.watcher.code_name.trim().is_empty() {
            return Err(AppError::validation("watcher.code_name is empty"));
        }
        url::Url::parse(&self.watcher.timeline_url)
            .map_err(|e| AppError::validation(format!("watcher.timeline_url: {e}")))?;
        url::Url::parse(&self.watcher.base_url)
            .map_err(|e| AppError::validation(format!("watcher.base_url: {e}")))?;
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if !self.notify.webhook_url.trim().is_empty() {
            url::Url::parse(&self.notify.webhook_url)
                .map_err(|e| AppError::validation(format!("notify.webhook_url: {e}")))?;
        }
        if self.notify.max_chunk_chars == 0 {
            return Err(AppError::validation("notify.max_chunk_chars must be > 0"));
        }
        if self.schedule.daily_hour > 23 {
            return Err(AppError::validation("schedule.daily_hour must be 0-23"));
        }
        if self.schedule.daily_minute > 59 || self.schedule.hourly_minute > 59 {
            return Err(AppError::validation("schedule minutes must be 0-59"));
        }
        if self.storage.history_file.trim().is_empty() {
            return Err(AppError::validation("storage.history_file is empty"));
        }
        self.selectors.validate()?;
        Ok(())
    }
}

/// Tracked code and timeline location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Display name of the tracked code
    #[serde(default = "defaults::code_name")]
    pub code_name: String,

    /// Timeline page of the tracked code
    #[serde(default = "defaults::timeline_url")]
    pub timeline_url: String,

    /// Base URL for resolving relative hrefs
    #[serde(default = "defaults::base_url")]
    pub base_url: String,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            code_name: defaults::code_name(),
            timeline_url: defaults::timeline_url(),
            base_url: defaults::base_url(),
        }
    }
}

/// Headless-browser fetch behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent string presented by the browser page
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Overall render timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Settle delay after navigation, in milliseconds
    #[serde(default = "defaults::settle_ms")]
    pub settle_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            settle_ms: defaults::settle_ms(),
        }
    }
}

/// Notification transport settings.
///
/// An empty `webhook_url` switches the notifier to console mode: messages
/// are logged instead of posted, which is the local-development default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook endpoint; overridden by `LEGIWATCH_WEBHOOK_URL`
    #[serde(default)]
    pub webhook_url: String,

    /// Mention target for daily reports; overridden by `LEGIWATCH_OWNER_ID`
    #[serde(default)]
    pub owner_id: String,

    /// Upper bound of one chunk body, in characters
    #[serde(default = "defaults::max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Accent color of report embeds
    #[serde(default = "defaults::embed_color")]
    pub embed_color: u32,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            owner_id: String::new(),
            max_chunk_chars: defaults::max_chunk_chars(),
            embed_color: defaults::embed_color(),
        }
    }
}

/// Daily and hourly trigger times, read against the local clock.
///
/// The deployment is expected to run with `TZ=Europe/Paris`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Hour of the daily report (0-23)
    #[serde(default = "defaults::daily_hour")]
    pub daily_hour: u32,

    /// Minute of the daily report (0-59)
    #[serde(default)]
    pub daily_minute: u32,

    /// Minute past each hour for the change probe (0-59)
    #[serde(default)]
    pub hourly_minute: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_hour: defaults::daily_hour(),
            daily_minute: 0,
            hourly_minute: 0,
        }
    }
}

/// History persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// History file name, relative to the storage directory
    #[serde(default = "defaults::history_file")]
    pub history_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_file: defaults::history_file(),
        }
    }
}

mod defaults {
    // Watcher defaults track the Code civil.
    pub fn code_name() -> String {
        "Code civil".into()
    }
    pub fn timeline_url() -> String {
        "https://www.legifrance.gouv.fr/codes/id/LEGITEXT000006070721".into()
    }
    pub fn base_url() -> String {
        "https://www.legifrance.gouv.fr".into()
    }

    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn settle_ms() -> u64 {
        500
    }

    // Notify defaults
    pub fn max_chunk_chars() -> usize {
        4096
    }
    pub fn embed_color() -> u32 {
        0x2e_75b6
    }

    // Schedule defaults
    pub fn daily_hour() -> u32 {
        22
    }

    // Storage defaults
    pub fn history_file() -> String {
        "history.json".into()
    }
}
