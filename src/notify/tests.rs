//! Tests for notification policy and formatting

use super::format::{advanced_reply, analysis_reply, signal_alert, trend_reply};
use super::{Notifier, NotifyPolicy};
use crate::error::BotError;
use crate::types::{
    AdvancedAnalysis, AnalysisResult, RiskLevel, Sentiment, TradeSetup, TrendAnalysis, Verdict,
};
use chrono::Utc;
use rust_decimal_macros::dec;

fn advanced(recommendation: Verdict, setup: Option<TradeSetup>) -> AdvancedAnalysis {
    AdvancedAnalysis {
        overall_trend: Verdict::Bullish,
        confidence: dec!(0.85),
        comprehensive_analysis: "Short timeframes confirm the 6hr structure.".to_string(),
        market_sentiment: Sentiment::Bullish,
        risk_level: RiskLevel::Medium,
        price_prediction: "Consolidation between $150-$155, breakout above $156.".to_string(),
        recommendation,
        reasoning: "All timeframes aligned to the upside.".to_string(),
        trade_setup: setup,
        indicators: None,
        generated_at: Utc::now(),
    }
}

fn setup() -> TradeSetup {
    TradeSetup {
        support_zone: "$148-$150".to_string(),
        resistance_zone: "$156-$158".to_string(),
        entry_price: "$151.50".to_string(),
        stop_loss: "$147.80".to_string(),
        take_profit: "$157.00".to_string(),
        confirmation: "1hr close above $152".to_string(),
    }
}

#[test]
fn test_strong_only_ignores_unchanged_verdict() {
    let policy = NotifyPolicy::StrongOnly;
    assert!(!policy.should_notify(Some(Verdict::Buy), Verdict::Buy));
    assert!(!policy.should_notify(Some(Verdict::StrongBuy), Verdict::StrongBuy));
}

#[test]
fn test_strong_only_fires_on_changed_strong_verdict() {
    let policy = NotifyPolicy::StrongOnly;
    assert!(policy.should_notify(Some(Verdict::Buy), Verdict::StrongSell));
    assert!(policy.should_notify(Some(Verdict::Hold), Verdict::StrongBuy));
}

#[test]
fn test_strong_only_ignores_weak_changes() {
    let policy = NotifyPolicy::StrongOnly;
    assert!(!policy.should_notify(Some(Verdict::Buy), Verdict::Sell));
    assert!(!policy.should_notify(Some(Verdict::StrongBuy), Verdict::Hold));
}

#[test]
fn test_first_verdict_counts_as_change() {
    assert!(NotifyPolicy::StrongOnly.should_notify(None, Verdict::StrongBuy));
    assert!(!NotifyPolicy::StrongOnly.should_notify(None, Verdict::Hold));
    assert!(NotifyPolicy::AnyChange.should_notify(None, Verdict::Hold));
}

#[test]
fn test_any_change_fires_on_every_transition() {
    let policy = NotifyPolicy::AnyChange;
    assert!(policy.should_notify(Some(Verdict::Buy), Verdict::Sell));
    assert!(policy.should_notify(Some(Verdict::Hold), Verdict::Buy));
    assert!(!policy.should_notify(Some(Verdict::Sell), Verdict::Sell));
}

#[test]
fn test_signal_alert_includes_trade_setup() {
    let analysis = AnalysisResult::Advanced(advanced(Verdict::StrongBuy, Some(setup())));
    let text = signal_alert("SOL", &analysis);

    assert!(text.contains("🟢 *SOL Trading Signal: STRONG BUY*"));
    assert!(text.contains("*Entry Price:* $151.50"));
    assert!(text.contains("*Support Zone:* $148-$150"));
    assert!(text.contains("not financial advice"));
}

#[test]
fn test_signal_alert_without_trade_setup() {
    let analysis = AnalysisResult::Advanced(advanced(Verdict::StrongSell, None));
    let text = signal_alert("SOL", &analysis);

    assert!(text.contains("🔴 *SOL Trading Signal: STRONG SELL*"));
    assert!(!text.contains("*Trade Setup:*"));
}

#[test]
fn test_signal_alert_reads_only_the_common_subset() {
    let trend = AnalysisResult::Trend(TrendAnalysis {
        trend: Verdict::StrongSell,
        confidence: dec!(0.9),
        reason: "Breakdown below support.".to_string(),
    });

    let text = signal_alert("BTC", &trend);
    assert!(text.contains("🔴 *BTC Trading Signal: STRONG SELL*"));
    assert!(text.contains("Breakdown below support."));
    assert!(!text.contains("*Trade Setup:*"));
}

#[test]
fn test_trend_reply_formatting() {
    let analysis = TrendAnalysis {
        trend: Verdict::Bullish,
        confidence: dec!(0.72),
        reason: "Higher highs on rising volume.".to_string(),
    };

    let text = trend_reply("BTC", &analysis);
    assert!(text.contains("*BTC Trend: BULLISH*"));
    assert!(text.contains("Confidence: 72%"));
    assert!(text.contains("Higher highs"));
}

#[test]
fn test_advanced_reply_formatting() {
    let text = advanced_reply("ETH", &advanced(Verdict::Buy, Some(setup())));

    assert!(text.contains("*ETH Advanced Analysis*"));
    assert!(text.contains("*Recommendation:* BUY"));
    assert!(text.contains("*Risk Level:* medium"));
    assert!(text.contains("*Confirmation:* 1hr close above $152"));
}

#[test]
fn test_analysis_reply_dispatches_per_flavor() {
    let trend = AnalysisResult::Trend(TrendAnalysis {
        trend: Verdict::Bearish,
        confidence: dec!(0.6),
        reason: "Lower lows.".to_string(),
    });
    assert!(analysis_reply("BTC", &trend).contains("*BTC Trend: BEARISH*"));

    let rich = AnalysisResult::Advanced(advanced(Verdict::Buy, None));
    assert!(analysis_reply("ETH", &rich).contains("*ETH Advanced Analysis*"));
}

#[tokio::test]
async fn test_disabled_notifier_send_is_ok() {
    let notifier = Notifier::disabled();
    assert!(notifier.send(42, "test message").await.is_ok());
}

#[tokio::test]
async fn test_rejected_send_is_an_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(b"HTTP/1.1 403 Forbidden\r\ncontent-length: 0\r\n\r\n")
            .await;
    });

    let notifier = Notifier::with_api_base(format!("http://{}", addr), "token".to_string());
    let result = notifier.send(42, "test message").await;

    assert!(matches!(result, Err(BotError::Telegram(_))));
}
