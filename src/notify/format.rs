//! Telegram message formatting (Markdown)

use crate::types::{AdvancedAnalysis, AnalysisResult, TradeSetup, TrendAnalysis, Verdict};
use rust_decimal::Decimal;

fn verdict_emoji(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::StrongBuy | Verdict::Buy | Verdict::Bullish => "🟢",
        Verdict::StrongSell | Verdict::Sell | Verdict::Bearish => "🔴",
        Verdict::Hold | Verdict::Neutral => "⚪",
    }
}

fn percent(value: Decimal) -> String {
    format!("{:.0}%", value * Decimal::ONE_HUNDRED)
}

fn trade_setup_block(setup: &TradeSetup) -> String {
    format!(
        "*Trade Setup:*\n\
        - *Entry Price:* {}\n\
        - *Stop-Loss (SL):* {}\n\
        - *Take-Profit (TP):* {}\n\n\
        *Key Levels:*\n\
        - *Support Zone:* {}\n\
        - *Resistance Zone:* {}\n\
        - *Confirmation:* {}",
        setup.entry_price,
        setup.stop_loss,
        setup.take_profit,
        setup.support_zone,
        setup.resistance_zone,
        setup.confirmation,
    )
}

/// Scheduled alert pushed to subscribers on a qualifying signal change.
/// Reads only the common subset of the union, so either analysis flavor
/// can drive an alert.
pub fn signal_alert(symbol: &str, analysis: &AnalysisResult) -> String {
    let verdict = analysis.verdict();
    let mut message = format!(
        "{} *{} Trading Signal: {}*\n\n\
        *Reasoning*: {}",
        verdict_emoji(verdict),
        symbol,
        verdict.as_str().to_uppercase(),
        analysis.rationale(),
    );

    if let Some(setup) = analysis.trade_setup() {
        message.push_str("\n\n");
        message.push_str(&trade_setup_block(setup));
    }

    message.push_str("\n\n*Disclaimer: This is not financial advice. Trade at your own risk.*");
    message
}

/// Reply for an on-demand analysis of either flavor
pub fn analysis_reply(symbol: &str, analysis: &AnalysisResult) -> String {
    match analysis {
        AnalysisResult::Trend(t) => trend_reply(symbol, t),
        AnalysisResult::Advanced(a) => advanced_reply(symbol, a),
    }
}

/// Reply to an on-demand /analyze command
pub fn trend_reply(symbol: &str, analysis: &TrendAnalysis) -> String {
    format!(
        "{} *{} Trend: {}*\n\
        Confidence: {}\n\n\
        {}",
        verdict_emoji(analysis.trend),
        symbol,
        analysis.trend.as_str().to_uppercase(),
        percent(analysis.confidence),
        analysis.reason,
    )
}

/// Reply to an on-demand /advanced_analyze command
pub fn advanced_reply(symbol: &str, analysis: &AdvancedAnalysis) -> String {
    let mut message = format!(
        "{} *{} Advanced Analysis*\n\n\
        *Overall Trend:* {}\n\
        *Recommendation:* {}\n\
        *Confidence:* {}\n\
        *Market Sentiment:* {}\n\
        *Risk Level:* {}\n\n\
        *Price Prediction:* {}\n\n\
        {}",
        verdict_emoji(analysis.recommendation),
        symbol,
        analysis.overall_trend,
        analysis.recommendation.as_str().to_uppercase(),
        percent(analysis.confidence),
        analysis.market_sentiment,
        analysis.risk_level,
        analysis.price_prediction,
        analysis.comprehensive_analysis,
    );

    if let Some(setup) = &analysis.trade_setup {
        message.push_str("\n\n");
        message.push_str(&trade_setup_block(setup));
    }

    if let Some(indicators) = &analysis.indicators {
        if !indicators.is_empty() {
            message.push_str("\n\n*Indicators:*");
            for reading in indicators {
                message.push_str(&format!(
                    "\n- *{}:* {} ({})",
                    reading.name, reading.value, reading.interpretation
                ));
            }
        }
    }

    message
}
