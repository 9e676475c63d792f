//! Gemini exchange REST client
//!
//! Fetches ticker snapshots and candlestick rows from the public v2 API.

use super::ExchangeApi;
use crate::error::{BotError, Result};
use crate::types::{Candle, Ticker, Timeframe};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Exchange pair token: symbols are quoted against USD ("BTC" -> "btcusd")
pub fn trading_pair(symbol: &str) -> String {
    format!("{}usd", symbol.trim().to_lowercase())
}

pub struct GeminiApi {
    http: Client,
    base_url: String,
}

impl GeminiApi {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ExchangeApi for GeminiApi {
    async fn fetch_ticker(&self, pair: &str) -> Result<Ticker> {
        let url = format!("{}/v2/ticker/{}", self.base_url, pair);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(BotError::Api(format!(
                "ticker fetch for {} failed: {}",
                pair,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn fetch_candles(&self, pair: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        let url = format!("{}/v2/candles/{}/{}", self.base_url, pair, timeframe);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(BotError::Api(format!(
                "candle fetch for {}/{} failed: {}",
                pair,
                timeframe,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}
