//! Analysis gateway
//!
//! Market analysis is delegated entirely to an external LLM: the bot ships
//! market payloads with a natural-language prompt and gets back a
//! schema-validated structured result. The gateway is non-deterministic and
//! treated as a black box; nothing here assumes analytical stability between
//! calls with identical input.

mod llm;

pub use llm::{LlmGateway, LlmProvider};

use crate::error::Result;
use crate::types::{AdvancedAnalysis, CandleSeries, Ticker, TrendAnalysis};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// Basic trend classification from a ticker snapshot
    async fn analyze_trend(&self, symbol: &str, ticker: &Ticker) -> Result<TrendAnalysis>;

    /// Multi-timeframe analysis from one or more candle series
    async fn analyze_multi_timeframe(
        &self,
        symbol: &str,
        series: &[CandleSeries],
    ) -> Result<AdvancedAnalysis>;
}
