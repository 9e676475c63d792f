//! Telegram command front-end
//!
//! Parses slash commands from incoming messages and executes them against
//! the stores, the market data client, and the analysis gateway.

mod updates;
#[cfg(test)]
mod tests;

pub use updates::UpdatePoller;

use crate::analysis::AnalysisGateway;
use crate::client::MarketDataClient;
use crate::notify::format;
use crate::store::SubscriptionStore;
use crate::types::{normalize_symbol, AnalysisResult, CandleSeries, Timeframe};
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::warn;

const HELP_TEXT: &str = "Here are the commands you can use:\n\
/subscribe <COIN> - Get trend updates for a coin (e.g., /subscribe BTC).\n\
/unsubscribe <COIN> - Stop getting updates for a coin.\n\
/list - See your current subscriptions.\n\
/analyze <COIN> - One-off AI trend analysis.\n\
/advanced_analyze <COIN> [timeframe] - Multi-timeframe analysis.\n\
/help - Show this message again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Subscribe(Option<String>),
    Unsubscribe(Option<String>),
    List,
    Analyze(Option<String>),
    AdvancedAnalyze {
        symbol: Option<String>,
        timeframe: Option<String>,
    },
    Unknown(String),
}

/// Parse message text into a command. Non-command text yields `None` and is
/// ignored upstream.
pub fn parse_command(text: &str) -> Option<Command> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }

    let mut parts = text.split_whitespace();
    let head = parts.next()?;
    // Group chats suffix commands with the bot name: /subscribe@SomeBot
    let head = head.split('@').next().unwrap_or(head);

    let command = match head {
        "/start" => Command::Start,
        "/help" => Command::Help,
        "/subscribe" => Command::Subscribe(parts.next().map(normalize_symbol)),
        "/unsubscribe" => Command::Unsubscribe(parts.next().map(normalize_symbol)),
        "/list" => Command::List,
        "/analyze" => Command::Analyze(parts.next().map(normalize_symbol)),
        "/advanced_analyze" => Command::AdvancedAnalyze {
            symbol: parts.next().map(normalize_symbol),
            timeframe: parts.next().map(str::to_string),
        },
        other => Command::Unknown(other.to_string()),
    };

    Some(command)
}

pub struct CommandHandler {
    market: Arc<MarketDataClient>,
    gateway: Arc<dyn AnalysisGateway>,
    subscriptions: Arc<dyn SubscriptionStore>,
    /// Timeframes used by /advanced_analyze when none is given
    default_timeframes: Vec<Timeframe>,
}

impl CommandHandler {
    pub fn new(
        market: Arc<MarketDataClient>,
        gateway: Arc<dyn AnalysisGateway>,
        subscriptions: Arc<dyn SubscriptionStore>,
        default_timeframes: Vec<Timeframe>,
    ) -> Self {
        Self {
            market,
            gateway,
            subscriptions,
            default_timeframes,
        }
    }

    /// Execute a message against the bot; `None` for non-command text
    pub async fn handle(&self, chat_id: i64, text: &str) -> Option<String> {
        let command = parse_command(text)?;

        let reply = match command {
            Command::Start => format!(
                "Welcome to CryptoTrendBot! 🤖\n\
                I track crypto market trends using AI.\n\n{HELP_TEXT}"
            ),
            Command::Help => HELP_TEXT.to_string(),
            Command::Subscribe(None) => {
                "Please specify a coin symbol. Usage: /subscribe <COIN>".to_string()
            }
            Command::Subscribe(Some(coin)) => {
                self.subscriptions.subscribe(chat_id, &coin);
                format!("✅ Subscribed to {coin}! You'll now receive trend updates.")
            }
            Command::Unsubscribe(None) => {
                "Please specify a coin symbol. Usage: /unsubscribe <COIN>".to_string()
            }
            Command::Unsubscribe(Some(coin)) => {
                self.subscriptions.unsubscribe(chat_id, &coin);
                format!("🚫 Unsubscribed from {coin}.")
            }
            Command::List => {
                let subs = self.subscriptions.subscriptions(chat_id);
                if subs.is_empty() {
                    "You are not subscribed to any coins yet. Use /subscribe <COIN> to start."
                        .to_string()
                } else {
                    format!("Your current subscriptions:\n- {}", subs.join("\n- "))
                }
            }
            Command::Analyze(None) => {
                "Please specify a coin symbol. Usage: /analyze <COIN>".to_string()
            }
            Command::Analyze(Some(coin)) => self.analyze(&coin).await,
            Command::AdvancedAnalyze { symbol: None, .. } => {
                "Please specify a coin symbol. Usage: /advanced_analyze <COIN> [timeframe]"
                    .to_string()
            }
            Command::AdvancedAnalyze {
                symbol: Some(coin),
                timeframe,
            } => self.advanced_analyze(&coin, timeframe.as_deref()).await,
            Command::Unknown(_) => {
                "Unrecognized command. Use /help to see available commands.".to_string()
            }
        };

        Some(reply)
    }

    async fn analyze(&self, coin: &str) -> String {
        let Some(ticker) = self.market.ticker(coin).await else {
            return format!("Could not fetch market data for {coin}. Is the symbol correct?");
        };

        match self.gateway.analyze_trend(coin, &ticker).await {
            Ok(analysis) => format::analysis_reply(coin, &AnalysisResult::Trend(analysis)),
            Err(e) => {
                warn!("Trend analysis for {} failed: {}", coin, e);
                format!("Analysis failed for {coin}. Please try again later.")
            }
        }
    }

    async fn advanced_analyze(&self, coin: &str, timeframe: Option<&str>) -> String {
        let timeframes = match timeframe {
            Some(token) => match token.parse::<Timeframe>() {
                Ok(tf) => vec![tf],
                Err(_) => {
                    return format!(
                        "Unknown timeframe '{token}'. Valid: 1m, 5m, 15m, 30m, 1hr, 6hr, 1day."
                    )
                }
            },
            None => self.default_timeframes.clone(),
        };

        let fetches = timeframes.iter().map(|tf| self.market.candles(coin, *tf));
        let series: Vec<CandleSeries> = join_all(fetches).await.into_iter().flatten().collect();

        if series.is_empty() {
            return format!("Could not fetch candlestick data for {coin}. Is the symbol correct?");
        }

        match self.gateway.analyze_multi_timeframe(coin, &series).await {
            Ok(analysis) => format::analysis_reply(coin, &AnalysisResult::Advanced(analysis)),
            Err(e) => {
                warn!("Advanced analysis for {} failed: {}", coin, e);
                format!("Analysis failed for {coin}. Please try again later.")
            }
        }
    }
}
