//! Tests for the in-memory stores

use super::{MemorySignalStore, MemorySubscriptionStore, SignalStore, SubscriptionStore};
use crate::types::Verdict;

#[test]
fn test_unknown_symbol_has_no_last_verdict() {
    let store = MemorySignalStore::new();
    assert_eq!(store.last("BTC"), None);
}

#[test]
fn test_record_then_last_round_trips() {
    let store = MemorySignalStore::new();
    store.record("BTC", Verdict::StrongBuy);
    assert_eq!(store.last("BTC"), Some(Verdict::StrongBuy));
}

#[test]
fn test_signal_store_normalizes_case() {
    let store = MemorySignalStore::new();
    store.record("btc", Verdict::Bearish);
    assert_eq!(store.last("BTC"), Some(Verdict::Bearish));
    assert_eq!(store.last(" btc "), Some(Verdict::Bearish));
}

#[test]
fn test_record_overwrites_previous_verdict() {
    let store = MemorySignalStore::new();
    store.record("ETH", Verdict::Buy);
    store.record("ETH", Verdict::Sell);
    assert_eq!(store.last("ETH"), Some(Verdict::Sell));
}

#[test]
fn test_subscribe_is_idempotent() {
    let store = MemorySubscriptionStore::new();
    store.subscribe(1, "BTC");
    store.subscribe(1, "btc");
    assert_eq!(store.subscriptions(1), vec!["BTC".to_string()]);
    assert_eq!(store.subscribers("BTC"), vec![1]);
}

#[test]
fn test_unsubscribe_is_idempotent() {
    let store = MemorySubscriptionStore::new();
    store.subscribe(1, "BTC");
    store.unsubscribe(1, "BTC");
    store.unsubscribe(1, "BTC");
    store.unsubscribe(2, "ETH");
    assert!(store.subscriptions(1).is_empty());
}

#[test]
fn test_subscribers_filtered_per_symbol() {
    let store = MemorySubscriptionStore::new();
    store.subscribe(1, "BTC");
    store.subscribe(2, "BTC");
    store.subscribe(2, "ETH");
    store.subscribe(3, "SOL");

    assert_eq!(store.subscribers("BTC"), vec![1, 2]);
    assert_eq!(store.subscribers("ETH"), vec![2]);
    assert!(store.subscribers("DOGE").is_empty());
}

#[test]
fn test_tracked_symbols_is_deduplicated_union() {
    let store = MemorySubscriptionStore::new();
    store.subscribe(1, "BTC");
    store.subscribe(2, "btc");
    store.subscribe(2, "ETH");

    assert_eq!(
        store.tracked_symbols(),
        vec!["BTC".to_string(), "ETH".to_string()]
    );
}

#[test]
fn test_fully_unsubscribed_symbol_is_not_tracked() {
    let store = MemorySubscriptionStore::new();
    store.subscribe(1, "BTC");
    store.subscribe(1, "ETH");
    store.unsubscribe(1, "BTC");

    assert_eq!(store.tracked_symbols(), vec!["ETH".to_string()]);
}
