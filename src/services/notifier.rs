// src/services/notifier.rs

//! Webhook delivery of formatted messages.
//!
//! Messages go out in submission order; each send is independent, so one
//! failed chunk never blocks the chunks behind it. An empty webhook URL
//! switches the notifier to console mode, where messages are logged
//! instead of posted. That is the local-development default.

use std::time::Duration;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::MessageChunk;

/// One embed of a webhook payload.
#[derive(Debug, Serialize)]
struct WebhookEmbed {
    title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    url: String,
    description: String,
    color: u32,
    timestamp: String,
}

impl WebhookEmbed {
    fn from_chunk(chunk: &MessageChunk) -> Self {
        Self {
            title: chunk.title.clone(),
            url: chunk.url.clone(),
            description: chunk.body.clone(),
            color: chunk.color,
            timestamp: chunk.timestamp.to_rfc3339(),
        }
    }
}

/// Webhook payload: plain text, embeds, or text plus embeds.
#[derive(Debug, Serialize)]
struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<WebhookEmbed>,
}

impl WebhookPayload {
    fn is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty) && self.embeds.is_empty()
    }
}

/// Ordered webhook transport.
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl Notifier {
    /// Create a notifier for the given webhook URL.
    ///
    /// An empty URL selects console mode.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    /// Whether messages are logged instead of posted.
    pub fn is_console(&self) -> bool {
        self.webhook_url.is_empty()
    }

    /// Send a plain text message.
    pub async fn send_text(&self, text: &str) -> Result<()> {
        self.post(&WebhookPayload {
            content: Some(text.to_string()),
            embeds: Vec::new(),
        })
        .await
    }

    /// Send one chunk as an embed, optionally preceded by mention text.
    pub async fn send_chunk(&self, chunk: &MessageChunk, mention: Option<&str>) -> Result<()> {
        self.post(&WebhookPayload {
            content: mention.map(str::to_string),
            embeds: vec![WebhookEmbed::from_chunk(chunk)],
        })
        .await
    }

    /// Send a whole report, chunk by chunk, in order.
    ///
    /// Only the first chunk carries the mention. A failed chunk is logged
    /// and skipped; the remaining chunks are still attempted. Returns the
    /// number of chunks delivered.
    pub async fn send_report(&self, chunks: &[MessageChunk], mention: Option<&str>) -> usize {
        let mut delivered = 0;
        for (index, chunk) in chunks.iter().enumerate() {
            let mention = if index == 0 { mention } else { None };
            match self.send_chunk(chunk, mention).await {
                Ok(()) => delivered += 1,
                Err(e) => log::error!(
                    "Failed to send chunk {}/{}: {}",
                    index + 1,
                    chunks.len(),
                    e
                ),
            }
        }
        delivered
    }

    async fn post(&self, payload: &WebhookPayload) -> Result<()> {
        if payload.is_empty() {
            return Err(AppError::notify("webhook", "refusing to send an empty payload"));
        }

        if self.is_console() {
            if let Some(content) = &payload.content {
                log::info!("(console notifier) {}", content);
            }
            for embed in &payload.embeds {
                log::info!("(console notifier) {}\n{}", embed.title, embed.description);
            }
            return Ok(());
        }

        let response = self.client.post(&self.webhook_url).json(payload).send().await?;
        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_chunk() -> MessageChunk {
        MessageChunk {
            title: "Journal".to_string(),
            url: "https://x.fr/version/2026-01-07".to_string(),
            color: 0x2e75b6,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 7, 21, 0, 0).unwrap(),
            body: "📄 **[Loi 2026-1](https://x.fr/loi/01)**\n".to_string(),
        }
    }

    #[test]
    fn test_text_payload_omits_embeds() {
        let payload = WebhookPayload {
            content: Some("bonjour".to_string()),
            embeds: Vec::new(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["content"], "bonjour");
        assert!(json.get("embeds").is_none());
    }

    #[test]
    fn test_embed_payload_omits_content() {
        let payload = WebhookPayload {
            content: None,
            embeds: vec![WebhookEmbed::from_chunk(&sample_chunk())],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["embeds"][0]["title"], "Journal");
        assert_eq!(json["embeds"][0]["color"], 0x2e75b6);
        assert_eq!(json["embeds"][0]["timestamp"], "2026-01-07T21:00:00+00:00");
    }

    #[test]
    fn test_embed_without_url_omits_the_field() {
        let mut chunk = sample_chunk();
        chunk.url = String::new();
        let json = serde_json::to_value(WebhookEmbed::from_chunk(&chunk)).unwrap();
        assert!(json.get("url").is_none());
        assert_eq!(json["description"], chunk.body);
    }

    #[tokio::test]
    async fn test_console_mode_accepts_messages() {
        let notifier = Notifier::new("").unwrap();
        assert!(notifier.is_console());

        notifier.send_text("bonjour").await.unwrap();
        notifier.send_chunk(&sample_chunk(), Some("<@42>")).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_payload_is_rejected() {
        let notifier = Notifier::new("").unwrap();
        assert!(notifier.send_text("").await.is_err());
    }

    #[tokio::test]
    async fn test_send_report_delivers_in_order() {
        let notifier = Notifier::new("").unwrap();
        let chunks = vec![sample_chunk(), sample_chunk()];
        assert_eq!(notifier.send_report(&chunks, Some("<@42>")).await, 2);
        assert_eq!(notifier.send_report(&[], None).await, 0);
    }
}
