//! Tests for command parsing and handling

use super::{parse_command, Command, CommandHandler};
use crate::analysis::MockAnalysisGateway;
use crate::client::{MarketDataClient, MockExchangeApi};
use crate::config::ExchangeConfig;
use crate::error::BotError;
use crate::store::{MemorySubscriptionStore, SubscriptionStore};
use crate::types::{Candle, Ticker, Timeframe, TrendAnalysis, Verdict};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn sample_ticker() -> Ticker {
    Ticker {
        symbol: "BTCUSD".to_string(),
        open: "64000.00".to_string(),
        high: "65000.00".to_string(),
        low: "63500.00".to_string(),
        close: "64800.00".to_string(),
        changes: vec!["64800.00".to_string()],
        bid: "64790.00".to_string(),
        ask: "64810.00".to_string(),
    }
}

fn handler(
    api: MockExchangeApi,
    gateway: MockAnalysisGateway,
) -> (CommandHandler, Arc<MemorySubscriptionStore>) {
    let subscriptions = Arc::new(MemorySubscriptionStore::new());
    let handler = CommandHandler::new(
        Arc::new(MarketDataClient::new(
            Box::new(api),
            &ExchangeConfig::default(),
        )),
        Arc::new(gateway),
        subscriptions.clone(),
        vec![Timeframe::OneHour],
    );
    (handler, subscriptions)
}

#[test]
fn test_parse_basic_commands() {
    assert_eq!(parse_command("/start"), Some(Command::Start));
    assert_eq!(parse_command("/help"), Some(Command::Help));
    assert_eq!(parse_command("/list"), Some(Command::List));
}

#[test]
fn test_parse_normalizes_symbol_argument() {
    assert_eq!(
        parse_command("/subscribe btc"),
        Some(Command::Subscribe(Some("BTC".to_string())))
    );
    assert_eq!(
        parse_command("/unsubscribe  eth "),
        Some(Command::Unsubscribe(Some("ETH".to_string())))
    );
}

#[test]
fn test_parse_strips_bot_mention() {
    assert_eq!(
        parse_command("/subscribe@CryptoTrendBot SOL"),
        Some(Command::Subscribe(Some("SOL".to_string())))
    );
}

#[test]
fn test_parse_advanced_analyze_with_timeframe() {
    assert_eq!(
        parse_command("/advanced_analyze btc 1hr"),
        Some(Command::AdvancedAnalyze {
            symbol: Some("BTC".to_string()),
            timeframe: Some("1hr".to_string()),
        })
    );
}

#[test]
fn test_parse_ignores_plain_text() {
    assert_eq!(parse_command("hello bot"), None);
    assert_eq!(parse_command(""), None);
}

#[test]
fn test_parse_unknown_command() {
    assert_eq!(
        parse_command("/frobnicate"),
        Some(Command::Unknown("/frobnicate".to_string()))
    );
}

#[tokio::test]
async fn test_subscribe_updates_store_and_replies() {
    let (handler, subscriptions) = handler(MockExchangeApi::new(), MockAnalysisGateway::new());

    let reply = handler.handle(7, "/subscribe btc").await.unwrap();

    assert!(reply.contains("Subscribed to BTC"));
    assert_eq!(subscriptions.subscriptions(7), vec!["BTC".to_string()]);
}

#[tokio::test]
async fn test_subscribe_without_argument_shows_usage() {
    let (handler, subscriptions) = handler(MockExchangeApi::new(), MockAnalysisGateway::new());

    let reply = handler.handle(7, "/subscribe").await.unwrap();

    assert!(reply.contains("Usage: /subscribe <COIN>"));
    assert!(subscriptions.subscriptions(7).is_empty());
}

#[tokio::test]
async fn test_list_reflects_subscriptions() {
    let (handler, subscriptions) = handler(MockExchangeApi::new(), MockAnalysisGateway::new());

    let empty = handler.handle(7, "/list").await.unwrap();
    assert!(empty.contains("not subscribed to any coins"));

    subscriptions.subscribe(7, "BTC");
    subscriptions.subscribe(7, "ETH");

    let listed = handler.handle(7, "/list").await.unwrap();
    assert!(listed.contains("- BTC"));
    assert!(listed.contains("- ETH"));
}

#[tokio::test]
async fn test_analyze_returns_formatted_trend() {
    let mut api = MockExchangeApi::new();
    api.expect_fetch_ticker().returning(|_| Ok(sample_ticker()));

    let mut gateway = MockAnalysisGateway::new();
    gateway.expect_analyze_trend().returning(|_, _| {
        Ok(TrendAnalysis {
            trend: Verdict::Bullish,
            confidence: dec!(0.8),
            reason: "momentum".to_string(),
        })
    });

    let (handler, _) = handler(api, gateway);
    let reply = handler.handle(7, "/analyze btc").await.unwrap();

    assert!(reply.contains("BTC Trend: BULLISH"));
    assert!(reply.contains("momentum"));
}

#[tokio::test]
async fn test_analyze_with_unfetchable_symbol() {
    let mut api = MockExchangeApi::new();
    api.expect_fetch_ticker()
        .returning(|_| Err(BotError::Api("status 404".to_string())));

    let (handler, _) = handler(api, MockAnalysisGateway::new());
    let reply = handler.handle(7, "/analyze nope").await.unwrap();

    assert!(reply.contains("Could not fetch market data for NOPE"));
}

#[tokio::test]
async fn test_analyze_gateway_failure_is_reported_gently() {
    let mut api = MockExchangeApi::new();
    api.expect_fetch_ticker().returning(|_| Ok(sample_ticker()));

    let mut gateway = MockAnalysisGateway::new();
    gateway
        .expect_analyze_trend()
        .returning(|_, _| Err(BotError::Analysis("schema violation".to_string())));

    let (handler, _) = handler(api, gateway);
    let reply = handler.handle(7, "/analyze btc").await.unwrap();

    assert!(reply.contains("Analysis failed for BTC"));
}

#[tokio::test]
async fn test_advanced_analyze_rejects_invalid_timeframe() {
    let (handler, _) = handler(MockExchangeApi::new(), MockAnalysisGateway::new());

    let reply = handler.handle(7, "/advanced_analyze btc 4hr").await.unwrap();

    assert!(reply.contains("Unknown timeframe '4hr'"));
}

#[tokio::test]
async fn test_advanced_analyze_uses_requested_timeframe() {
    let mut api = MockExchangeApi::new();
    api.expect_fetch_candles()
        .withf(|_, tf| *tf == Timeframe::OneDay)
        .times(1)
        .returning(|_, _| {
            Ok(vec![Candle(
                1,
                dec!(100),
                dec!(110),
                dec!(90),
                dec!(105),
                dec!(10),
            )])
        });

    let mut gateway = MockAnalysisGateway::new();
    gateway
        .expect_analyze_multi_timeframe()
        .withf(|symbol, series| symbol == "BTC" && series.len() == 1)
        .returning(|_, _| {
            Err(BotError::Analysis("stubbed".to_string()))
        });

    let (handler, _) = handler(api, gateway);
    let reply = handler
        .handle(7, "/advanced_analyze btc 1day")
        .await
        .unwrap();

    // Gateway was reached with the single requested timeframe.
    assert!(reply.contains("Analysis failed for BTC"));
}

#[tokio::test]
async fn test_non_command_text_gets_no_reply() {
    let (handler, _) = handler(MockExchangeApi::new(), MockAnalysisGateway::new());
    assert!(handler.handle(7, "what is the price?").await.is_none());
}
