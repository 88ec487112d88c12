//! Notification delivery to the configured Telegram chat.
//!
//! Delivery is fire-and-forget from the webhook endpoint's point of view:
//! the endpoint spawns the send and a failure here is logged, never
//! surfaced to the webhook sender.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{BridgeError, Result};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Delivery seam for formatted notification messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Name of this delivery channel.
    fn name(&self) -> &'static str;

    /// Returns true if the channel is configured for real delivery.
    fn enabled(&self) -> bool;

    /// Deliver one formatted message.
    async fn send(&self, message: &str) -> Result<()>;
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

/// Sends notifications to a single configured admin chat via the Telegram
/// Bot API. Without a token and chat id it degrades to logging the
/// message, so the webhook pipeline stays usable in local setups.
pub struct TelegramNotifier {
    token: Option<String>,
    chat_id: Option<String>,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(token: Option<String>, chat_id: Option<String>) -> Self {
        if token.is_some() && chat_id.is_some() {
            debug!("Telegram notifications enabled");
        } else {
            debug!("Telegram notifications disabled (missing bot token or admin chat id)");
        }
        Self {
            token,
            chat_id,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn enabled(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }

    async fn send(&self, message: &str) -> Result<()> {
        let (Some(token), Some(chat_id)) = (&self.token, &self.chat_id) else {
            // Log-only fallback when no delivery target is configured.
            info!("Webhook notification: {}", message);
            return Ok(());
        };

        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_BASE, token);
        let request = SendMessageRequest {
            chat_id,
            text: message,
            parse_mode: "MarkdownV2",
            disable_web_page_preview: true,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if response.status().is_success() {
            debug!("Notification delivered to chat {}", chat_id);
            Ok(())
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(BridgeError::TelegramApi { status, body })
        }
    }
}
