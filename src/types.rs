//! Core data types shared across the bot

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalize a user-supplied coin symbol ("btc " -> "BTC")
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Ticker snapshot from the exchange's v2 ticker endpoint
///
/// Price fields are strings as delivered by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    /// Hourly percentage changes over the reference window
    pub changes: Vec<String>,
    pub bid: String,
    pub ask: String,
}

/// One OHLCV bar: [time, open, high, low, close, volume]
///
/// Serialized as a 6-element array to match the upstream wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle(
    pub i64,
    pub Decimal,
    pub Decimal,
    pub Decimal,
    pub Decimal,
    pub Decimal,
);

impl Candle {
    pub fn timestamp(&self) -> i64 {
        self.0
    }

    pub fn open(&self) -> Decimal {
        self.1
    }

    pub fn high(&self) -> Decimal {
        self.2
    }

    pub fn low(&self) -> Decimal {
        self.3
    }

    pub fn close(&self) -> Decimal {
        self.4
    }

    pub fn volume(&self) -> Decimal {
        self.5
    }
}

/// Ordered candles for one symbol + timeframe, newest-first
///
/// Never empty: a failed or empty fetch yields `None` at the client
/// boundary instead of an empty series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub candles: Vec<Candle>,
}

impl CandleSeries {
    /// Most recent bar (index 0 after the client reverses upstream order)
    pub fn latest(&self) -> &Candle {
        &self.candles[0]
    }
}

/// Candle granularity tokens accepted by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1hr")]
    OneHour,
    #[serde(rename = "6hr")]
    SixHours,
    #[serde(rename = "1day")]
    OneDay,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::ThirtyMinutes => "30m",
            Timeframe::OneHour => "1hr",
            Timeframe::SixHours => "6hr",
            Timeframe::OneDay => "1day",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Timeframe::OneMinute),
            "5m" => Ok(Timeframe::FiveMinutes),
            "15m" => Ok(Timeframe::FifteenMinutes),
            "30m" => Ok(Timeframe::ThirtyMinutes),
            "1hr" => Ok(Timeframe::OneHour),
            "6hr" => Ok(Timeframe::SixHours),
            "1day" => Ok(Timeframe::OneDay),
            other => Err(format!("unknown timeframe: {other}")),
        }
    }
}

/// Categorical analysis output, covering both analysis flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "strong buy")]
    StrongBuy,
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "hold")]
    Hold,
    #[serde(rename = "sell")]
    Sell,
    #[serde(rename = "strong sell")]
    StrongSell,
    #[serde(rename = "bullish")]
    Bullish,
    #[serde(rename = "bearish")]
    Bearish,
    #[serde(rename = "neutral")]
    Neutral,
}

impl Verdict {
    /// Strong categories qualify for alerts under the strong-only policy
    pub fn is_strong(&self) -> bool {
        matches!(self, Verdict::StrongBuy | Verdict::StrongSell)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::StrongBuy => "strong buy",
            Verdict::Buy => "buy",
            Verdict::Hold => "hold",
            Verdict::Sell => "sell",
            Verdict::StrongSell => "strong sell",
            Verdict::Bullish => "bullish",
            Verdict::Bearish => "bearish",
            Verdict::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated market sentiment from the rich analysis flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "extremely bullish")]
    ExtremelyBullish,
    #[serde(rename = "bullish")]
    Bullish,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "bearish")]
    Bearish,
    #[serde(rename = "extremely bearish")]
    ExtremelyBearish,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::ExtremelyBullish => "extremely bullish",
            Sentiment::Bullish => "bullish",
            Sentiment::Neutral => "neutral",
            Sentiment::Bearish => "bearish",
            Sentiment::ExtremelyBearish => "extremely bearish",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        f.write_str(s)
    }
}

/// Basic trend classification from ticker data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: Verdict,
    /// Confidence in [0, 1], clamped on parse
    pub confidence: Decimal,
    pub reason: String,
}

/// Suggested levels for acting on a signal, free-text as produced
/// by the model ("$50k-$52k"). Consumed only by the formatting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub support_zone: String,
    pub resistance_zone: String,
    pub entry_price: String,
    pub stop_loss: String,
    pub take_profit: String,
    pub confirmation: String,
}

/// Single indicator readout (RSI, MACD, EMA, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub name: String,
    pub value: String,
    pub interpretation: String,
}

/// Multi-timeframe analysis from the rich flavor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedAnalysis {
    pub overall_trend: Verdict,
    pub confidence: Decimal,
    pub comprehensive_analysis: String,
    pub market_sentiment: Sentiment,
    pub risk_level: RiskLevel,
    pub price_prediction: String,
    pub recommendation: Verdict,
    pub reasoning: String,
    #[serde(default)]
    pub trade_setup: Option<TradeSetup>,
    #[serde(default)]
    pub indicators: Option<Vec<IndicatorReading>>,
    /// Stamped locally when the analysis is received, not taken from the model
    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
}

/// Tagged union over the analysis flavors
///
/// Consumers of the notification path depend only on the common subset
/// (verdict, confidence, rationale); richer fields are read by the
/// formatting layer alone.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Trend(TrendAnalysis),
    Advanced(AdvancedAnalysis),
}

impl AnalysisResult {
    pub fn verdict(&self) -> Verdict {
        match self {
            AnalysisResult::Trend(t) => t.trend,
            AnalysisResult::Advanced(a) => a.recommendation,
        }
    }

    pub fn confidence(&self) -> Decimal {
        match self {
            AnalysisResult::Trend(t) => t.confidence,
            AnalysisResult::Advanced(a) => a.confidence,
        }
    }

    pub fn rationale(&self) -> &str {
        match self {
            AnalysisResult::Trend(t) => &t.reason,
            AnalysisResult::Advanced(a) => &a.reasoning,
        }
    }

    pub fn trade_setup(&self) -> Option<&TradeSetup> {
        match self {
            AnalysisResult::Trend(_) => None,
            AnalysisResult::Advanced(a) => a.trade_setup.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" btc "), "BTC");
        assert_eq!(normalize_symbol("ETH"), "ETH");
    }

    #[test]
    fn test_candle_from_wire_array() {
        let json = "[1718000000000, 64000.5, 64500.0, 63800.25, 64200.0, 123.45]";
        let candle: Candle = serde_json::from_str(json).unwrap();

        assert_eq!(candle.timestamp(), 1718000000000);
        assert_eq!(candle.open(), dec!(64000.5));
        assert_eq!(candle.volume(), dec!(123.45));
    }

    #[test]
    fn test_timeframe_round_trip() {
        for tf in ["1m", "5m", "15m", "30m", "1hr", "6hr", "1day"] {
            let parsed: Timeframe = tf.parse().unwrap();
            assert_eq!(parsed.as_str(), tf);
        }
        assert!("4hr".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_verdict_wire_strings() {
        let v: Verdict = serde_json::from_str("\"strong buy\"").unwrap();
        assert_eq!(v, Verdict::StrongBuy);
        assert!(v.is_strong());
        assert!(!Verdict::Buy.is_strong());
        assert_eq!(serde_json::to_string(&Verdict::StrongSell).unwrap(), "\"strong sell\"");
    }

    #[test]
    fn test_analysis_result_common_subset() {
        let trend = AnalysisResult::Trend(TrendAnalysis {
            trend: Verdict::Bullish,
            confidence: dec!(0.72),
            reason: "higher highs on rising volume".to_string(),
        });

        assert_eq!(trend.verdict(), Verdict::Bullish);
        assert_eq!(trend.confidence(), dec!(0.72));
        assert!(trend.trade_setup().is_none());
    }
}
