//! Telegram long-poll update loop

use super::CommandHandler;
use crate::error::{BotError, Result};
use crate::notify::Notifier;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::error;

/// Long-poll window requested from Telegram, in seconds
const POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    chat: Chat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

/// Pulls updates from the Bot API and dispatches commands to the handler
pub struct UpdatePoller {
    http: Client,
    bot_token: String,
    handler: CommandHandler,
    notifier: Notifier,
    offset: i64,
}

impl UpdatePoller {
    pub fn new(bot_token: String, handler: CommandHandler, notifier: Notifier) -> Result<Self> {
        // Client timeout must outlast the long-poll window.
        let http = Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()?;

        Ok(Self {
            http,
            bot_token,
            handler,
            notifier,
            offset: 0,
        })
    }

    pub async fn run(mut self) {
        loop {
            match self.poll().await {
                Ok(updates) => {
                    for update in updates {
                        self.dispatch(update).await;
                    }
                }
                Err(e) => {
                    error!("getUpdates failed: {}", e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    async fn poll(&mut self) -> Result<Vec<Update>> {
        let url = format!(
            "https://api.telegram.org/bot{}/getUpdates",
            self.bot_token
        );

        let response: UpdatesResponse = self
            .http
            .get(&url)
            .query(&[
                ("timeout", POLL_TIMEOUT_SECS.to_string()),
                ("offset", self.offset.to_string()),
            ])
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(BotError::Telegram("getUpdates returned ok=false".into()));
        }

        if let Some(last) = response.result.last() {
            self.offset = last.update_id + 1;
        }

        Ok(response.result)
    }

    async fn dispatch(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text else {
            return;
        };

        if let Some(reply) = self.handler.handle(message.chat.id, &text).await {
            if let Err(e) = self.notifier.send(message.chat.id, &reply).await {
                error!("Failed to reply to chat {}: {}", message.chat.id, e);
            }
        }
    }
}
