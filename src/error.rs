//! Error types for the bot

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Telegram error: {0}")]
    Telegram(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
