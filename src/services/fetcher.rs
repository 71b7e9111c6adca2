// src/services/fetcher.rs

//! Headless-browser retrieval of the timeline page.
//!
//! The timeline accordion is rendered client-side, so a plain HTTP GET
//! returns an empty shell. Each fetch launches a short-lived headless
//! Chrome, navigates with a spoofed desktop user agent, waits for the
//! render to settle and captures the resulting markup.

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};
use crate::models::FetchConfig;

/// Browser-backed fetcher for the timeline page.
#[derive(Debug, Clone)]
pub struct TimelineFetcher {
    config: FetchConfig,
}

impl TimelineFetcher {
    /// Create a fetcher with the given fetch settings.
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    /// Fetch the fully rendered markup of `url`.
    ///
    /// The navigate-settle-capture sequence runs under the configured
    /// timeout; on expiry the tick is abandoned with
    /// [`AppError::FetchTimeout`] and the browser is torn down without
    /// any partial result.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let (mut browser, handler) = self.launch().await?;

        let outcome = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            self.render(&browser, url),
        )
        .await;

        // Tear down the browser before reporting, so a timed-out tick
        // does not leave a Chrome process behind.
        if let Err(e) = browser.close().await {
            log::warn!("Browser close failed: {}", e);
        }
        handler.abort();

        match outcome {
            Ok(result) => result,
            Err(_) => Err(AppError::FetchTimeout(self.config.timeout_secs)),
        }
    }

    /// Launch a headless browser with container-safe flags.
    async fn launch(&self) -> Result<(Browser, JoinHandle<()>)> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-setuid-sandbox")
            .arg("--no-first-run")
            .arg("--headless=new")
            .build()
            .map_err(AppError::browser)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handle = tokio::spawn(async move { while handler.next().await.is_some() {} });

        Ok((browser, handle))
    }

    /// Navigate, wait for the page to settle and capture its markup.
    async fn render(&self, browser: &Browser, url: &str) -> Result<String> {
        let page = browser.new_page("about:blank").await?;
        page.execute(SetUserAgentOverrideParams::new(&self.config.user_agent))
            .await?;

        page.goto(url).await?;
        page.wait_for_navigation().await?;
        tokio::time::sleep(Duration::from_millis(self.config.settle_ms)).await;

        Ok(page.content().await?)
    }
}
