//! Configuration management

use crate::notify::NotifyPolicy;
use crate::types::Timeframe;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub exchange: ExchangeConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token from @BotFather
    pub bot_token: String,
    /// Extra chat that receives every signal alert (operator channel)
    pub admin_chat_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Exchange REST endpoint
    pub base_url: String,
    /// Ticker cache freshness window
    pub ticker_ttl_secs: i64,
    /// Candle cache freshness window (bar data goes stale faster)
    pub candle_ttl_secs: i64,
    /// Outbound HTTP timeout
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// LLM provider (anthropic, openai, compatible)
    pub provider: String,
    /// API key
    pub api_key: String,
    /// Model name (provider default when omitted)
    pub model: Option<String>,
    /// Base URL (required for the compatible provider)
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Seconds between notification cycles
    pub interval_secs: u64,
    /// Notification predicate
    pub policy: NotifyPolicy,
    /// Timeframes fetched per instrument each cycle
    pub timeframes: Vec<Timeframe>,
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path
            .as_ref()
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non-UTF8 config path"))?;

        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("CRYPTOBOT").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    /// Load from default locations
    pub fn load_default() -> anyhow::Result<Self> {
        let paths = ["config.toml", "~/.config/cryptotrend-bot/config.toml"];

        for path in paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::load(expanded.as_ref());
            }
        }

        anyhow::bail!("No configuration file found")
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.gemini.com".to_string(),
            ticker_ttl_secs: 60,
            candle_ttl_secs: 30,
            request_timeout_secs: 30,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            policy: NotifyPolicy::StrongOnly,
            timeframes: vec![
                Timeframe::FiveMinutes,
                Timeframe::FifteenMinutes,
                Timeframe::OneHour,
                Timeframe::SixHours,
            ],
        }
    }
}
