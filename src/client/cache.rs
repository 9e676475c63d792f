//! In-memory TTL caches for exchange data
//!
//! The upstream is a rate-limited public API; short-lived caching amortizes
//! repeated reads within one notification cycle. Entries are replaced
//! wholesale on refresh; there is no eviction beyond natural replacement
//! after expiry.

use crate::types::{CandleSeries, Ticker, Timeframe};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Payload paired with its fetch timestamp
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Utc::now(),
        }
    }

    // Strict comparison so a zero TTL deterministically disables caching.
    fn is_fresh(&self, ttl: Duration) -> bool {
        Utc::now() - self.fetched_at < ttl
    }
}

/// Ticker cache keyed by exchange pair
#[derive(Debug)]
pub struct TickerCache {
    entries: RwLock<HashMap<String, CacheEntry<Ticker>>>,
    ttl: Duration,
}

impl TickerCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn get(&self, pair: &str) -> Option<Ticker> {
        let entries = self.entries.read();
        entries
            .get(pair)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.value.clone())
    }

    pub fn put(&self, pair: &str, ticker: Ticker) {
        let mut entries = self.entries.write();
        entries.insert(pair.to_string(), CacheEntry::new(ticker));
    }
}

/// Candle cache keyed by (pair, timeframe)
#[derive(Debug)]
pub struct CandleCache {
    entries: RwLock<HashMap<(String, Timeframe), CacheEntry<CandleSeries>>>,
    ttl: Duration,
}

impl CandleCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn get(&self, pair: &str, timeframe: Timeframe) -> Option<CandleSeries> {
        let entries = self.entries.read();
        entries
            .get(&(pair.to_string(), timeframe))
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.value.clone())
    }

    pub fn put(&self, pair: &str, timeframe: Timeframe, series: CandleSeries) {
        let mut entries = self.entries.write();
        entries.insert((pair.to_string(), timeframe), CacheEntry::new(series));
    }
}
