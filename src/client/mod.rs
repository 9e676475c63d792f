//! Market data client
//!
//! Cache-or-fetch access to exchange ticker and candle data. Fetch errors
//! never cross this boundary: callers get `None` and the error is logged.

mod cache;
mod exchange;

pub use exchange::{trading_pair, GeminiApi};

use crate::config::ExchangeConfig;
use crate::error::Result;
use crate::types::{normalize_symbol, Candle, CandleSeries, Ticker, Timeframe};
use async_trait::async_trait;
use cache::{CandleCache, TickerCache};

/// Raw exchange access, mockable in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    async fn fetch_ticker(&self, pair: &str) -> Result<Ticker>;

    /// Candle rows as delivered upstream: oldest-first
    async fn fetch_candles(&self, pair: &str, timeframe: Timeframe) -> Result<Vec<Candle>>;
}

/// Market data client with short-TTL caching
pub struct MarketDataClient {
    api: Box<dyn ExchangeApi>,
    tickers: TickerCache,
    candles: CandleCache,
}

impl MarketDataClient {
    pub fn new(api: Box<dyn ExchangeApi>, config: &ExchangeConfig) -> Self {
        Self {
            api,
            tickers: TickerCache::new(config.ticker_ttl_secs),
            candles: CandleCache::new(config.candle_ttl_secs),
        }
    }

    /// Build against the live exchange endpoint
    pub fn from_config(config: &ExchangeConfig) -> Result<Self> {
        let api = GeminiApi::new(&config.base_url, config.request_timeout_secs)?;
        Ok(Self::new(Box::new(api), config))
    }

    /// Current ticker for a symbol, cached within the freshness window
    pub async fn ticker(&self, symbol: &str) -> Option<Ticker> {
        let pair = trading_pair(symbol);

        if let Some(ticker) = self.tickers.get(&pair) {
            return Some(ticker);
        }

        match self.api.fetch_ticker(&pair).await {
            Ok(ticker) => {
                self.tickers.put(&pair, ticker.clone());
                Some(ticker)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch ticker for {}: {}", pair, e);
                None
            }
        }
    }

    /// Candle series for a symbol + timeframe, newest-first, cached within
    /// the freshness window. An empty upstream payload yields `None`.
    pub async fn candles(&self, symbol: &str, timeframe: Timeframe) -> Option<CandleSeries> {
        let pair = trading_pair(symbol);

        if let Some(series) = self.candles.get(&pair, timeframe) {
            return Some(series);
        }

        match self.api.fetch_candles(&pair, timeframe).await {
            Ok(mut rows) => {
                if rows.is_empty() {
                    tracing::warn!("Empty candle payload for {}/{}", pair, timeframe);
                    return None;
                }

                // Upstream returns oldest-first; callers want index 0 most recent.
                rows.reverse();

                let series = CandleSeries {
                    symbol: normalize_symbol(symbol),
                    timeframe,
                    candles: rows,
                };
                self.candles.put(&pair, timeframe, series.clone());
                Some(series)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch candles for {}/{}: {}", pair, timeframe, e);
                None
            }
        }
    }
}
