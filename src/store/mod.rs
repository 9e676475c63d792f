//! Signal and subscription stores
//!
//! Injected trait objects backed in-process by plain maps. A durable
//! backend (Redis, Postgres, ...) swaps in behind the same traits without
//! touching call sites; state here lives only for the process lifetime.

#[cfg(test)]
mod tests;

use crate::types::{normalize_symbol, Verdict};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};

/// Last observed verdict per instrument, used purely for de-duplication
pub trait SignalStore: Send + Sync {
    /// Last recorded verdict for a symbol, `None` if never analyzed
    fn last(&self, symbol: &str) -> Option<Verdict>;

    /// Unconditionally overwrite the stored verdict
    fn record(&self, symbol: &str, verdict: Verdict);
}

/// Subscriber -> set of instruments of interest
pub trait SubscriptionStore: Send + Sync {
    /// Idempotent add
    fn subscribe(&self, chat_id: i64, symbol: &str);

    /// Idempotent remove
    fn unsubscribe(&self, chat_id: i64, symbol: &str);

    /// Symbols a chat is subscribed to, sorted
    fn subscriptions(&self, chat_id: i64) -> Vec<String>;

    /// Chats subscribed to a symbol
    fn subscribers(&self, symbol: &str) -> Vec<i64>;

    /// Union of all subscription sets, deduplicated and sorted.
    /// Symbols with zero subscribers never appear here, so the scanner
    /// skips them entirely.
    fn tracked_symbols(&self) -> Vec<String>;
}

/// In-memory signal store
#[derive(Debug, Default)]
pub struct MemorySignalStore {
    verdicts: RwLock<HashMap<String, Verdict>>,
}

impl MemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignalStore for MemorySignalStore {
    fn last(&self, symbol: &str) -> Option<Verdict> {
        let verdicts = self.verdicts.read();
        verdicts.get(&normalize_symbol(symbol)).copied()
    }

    fn record(&self, symbol: &str, verdict: Verdict) {
        let mut verdicts = self.verdicts.write();
        verdicts.insert(normalize_symbol(symbol), verdict);
    }
}

/// In-memory subscription store
#[derive(Debug, Default)]
pub struct MemorySubscriptionStore {
    subscriptions: RwLock<HashMap<i64, BTreeSet<String>>>,
}

impl MemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriptionStore for MemorySubscriptionStore {
    fn subscribe(&self, chat_id: i64, symbol: &str) {
        let mut subs = self.subscriptions.write();
        subs.entry(chat_id)
            .or_default()
            .insert(normalize_symbol(symbol));
    }

    fn unsubscribe(&self, chat_id: i64, symbol: &str) {
        let mut subs = self.subscriptions.write();
        // The chat's entry stays around even when its set empties out.
        if let Some(set) = subs.get_mut(&chat_id) {
            set.remove(&normalize_symbol(symbol));
        }
    }

    fn subscriptions(&self, chat_id: i64) -> Vec<String> {
        let subs = self.subscriptions.read();
        subs.get(&chat_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn subscribers(&self, symbol: &str) -> Vec<i64> {
        let wanted = normalize_symbol(symbol);
        let subs = self.subscriptions.read();
        let mut chats: Vec<i64> = subs
            .iter()
            .filter(|(_, set)| set.contains(&wanted))
            .map(|(chat_id, _)| *chat_id)
            .collect();
        chats.sort_unstable();
        chats
    }

    fn tracked_symbols(&self) -> Vec<String> {
        let subs = self.subscriptions.read();
        let unique: BTreeSet<String> = subs.values().flatten().cloned().collect();
        unique.into_iter().collect()
    }
}
