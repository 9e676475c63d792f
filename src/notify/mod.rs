//! Telegram notification module
//!
//! Sends command replies and scheduled signal alerts via the Bot API.

pub mod format;
mod policy;
#[cfg(test)]
mod tests;

pub use policy::NotifyPolicy;

use crate::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Outbound message delivery, mockable in tests
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn deliver(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Telegram notifier
#[derive(Clone)]
pub struct Notifier {
    http: Client,
    api_base: String,
    bot_token: String,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct TelegramMessage {
    chat_id: i64,
    text: String,
    parse_mode: String,
}

impl Notifier {
    pub fn new(bot_token: String) -> Self {
        Self::with_api_base(TELEGRAM_API_BASE.to_string(), bot_token)
    }

    /// Point at a non-default Bot API server (also used by tests)
    pub fn with_api_base(api_base: String, bot_token: String) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token,
            enabled: true,
        }
    }

    /// Create a disabled notifier (for when Telegram is not configured)
    pub fn disabled() -> Self {
        Self {
            http: Client::new(),
            api_base: TELEGRAM_API_BASE.to_string(),
            bot_token: String::new(),
            enabled: false,
        }
    }

    /// Send a Markdown message to a chat. A rejected send is an error, so
    /// callers can count only accepted deliveries.
    pub async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);

        let msg = TelegramMessage {
            chat_id,
            text: text.to_string(),
            parse_mode: "Markdown".to_string(),
        };

        let response = self.http.post(&url).json(&msg).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BotError::Telegram(format!(
                "sendMessage to {} failed: {} {}",
                chat_id, status, error_text
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Messenger for Notifier {
    async fn deliver(&self, chat_id: i64, text: &str) -> Result<()> {
        self.send(chat_id, text).await
    }
}
