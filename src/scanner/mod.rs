//! Periodic signal scanner
//!
//! Each cycle: pull fresh candles for every tracked instrument, run the
//! analysis gateway, compare the verdict against the signal store, and alert
//! subscribers on a qualifying change. Failures are isolated per instrument
//! and per recipient; a missed instrument is simply re-evaluated next tick.


use crate::analysis::AnalysisGateway;
use crate::client::MarketDataClient;
use crate::config::ScannerConfig;
use crate::error::Result;
use crate::notify::{format, Messenger, NotifyPolicy};
use crate::store::{SignalStore, SubscriptionStore};
use crate::types::{AnalysisResult, CandleSeries, Timeframe};
use futures_util::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Completion status of one cycle, for logging only
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub evaluated: usize,
    pub notified: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum SymbolOutcome {
    /// Alert delivered to this many recipients
    Notified(usize),
    /// Verdict recorded without an alert
    Recorded,
    /// No market data available this cycle
    NoData,
}

pub struct SignalScanner {
    market: Arc<MarketDataClient>,
    gateway: Arc<dyn AnalysisGateway>,
    signals: Arc<dyn SignalStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
    messenger: Arc<dyn Messenger>,
    policy: NotifyPolicy,
    timeframes: Vec<Timeframe>,
    admin_chat_id: Option<i64>,
}

impl SignalScanner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market: Arc<MarketDataClient>,
        gateway: Arc<dyn AnalysisGateway>,
        signals: Arc<dyn SignalStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
        messenger: Arc<dyn Messenger>,
        config: &ScannerConfig,
        admin_chat_id: Option<i64>,
    ) -> Self {
        Self {
            market,
            gateway,
            signals,
            subscriptions,
            messenger,
            policy: config.policy,
            timeframes: config.timeframes.clone(),
            admin_chat_id,
        }
    }

    /// Re-invoke `run_once` on every scheduler tick, forever
    pub async fn run(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let report = self.run_once().await;
            info!(
                "Scan cycle done: {} evaluated, {} notified, {} skipped, {} failed",
                report.evaluated, report.notified, report.skipped, report.failed
            );
        }
    }

    /// One notification cycle over all tracked instruments
    pub async fn run_once(&self) -> CycleReport {
        let symbols = self.subscriptions.tracked_symbols();
        if symbols.is_empty() {
            debug!("No subscriptions; skipping cycle");
            return CycleReport::default();
        }

        let mut report = CycleReport::default();
        for symbol in symbols {
            report.evaluated += 1;
            match self.process_symbol(&symbol).await {
                Ok(SymbolOutcome::Notified(recipients)) => {
                    info!("Alerted {} recipients about {}", recipients, symbol);
                    report.notified += 1;
                }
                Ok(SymbolOutcome::Recorded) => {}
                Ok(SymbolOutcome::NoData) => report.skipped += 1,
                Err(e) => {
                    // One bad instrument never aborts the cycle.
                    error!("Error processing signal for {}: {}", symbol, e);
                    report.failed += 1;
                }
            }
        }
        report
    }

    async fn process_symbol(&self, symbol: &str) -> Result<SymbolOutcome> {
        // Independent network calls, awaited together.
        let fetches = self
            .timeframes
            .iter()
            .map(|tf| self.market.candles(symbol, *tf));
        let series: Vec<CandleSeries> = join_all(fetches).await.into_iter().flatten().collect();

        if series.is_empty() {
            warn!("Could not fetch any candlestick data for {}", symbol);
            return Ok(SymbolOutcome::NoData);
        }

        let analysis =
            AnalysisResult::Advanced(self.gateway.analyze_multi_timeframe(symbol, &series).await?);
        let verdict = analysis.verdict();
        let last = self.signals.last(symbol);

        debug!(
            "Analyzed {}: last signal {:?}, current signal '{}'",
            symbol, last, verdict
        );

        let mut delivered = 0;
        if self.policy.should_notify(last, verdict) {
            let text = format::signal_alert(symbol, &analysis);
            for chat_id in self.recipients(symbol) {
                match self.messenger.deliver(chat_id, &text).await {
                    Ok(()) => delivered += 1,
                    Err(e) => {
                        // Per-recipient isolation: log and keep delivering.
                        error!(
                            "Failed to deliver {} alert to chat {}: {}",
                            symbol, chat_id, e
                        );
                    }
                }
            }
        }

        // The store always reflects the most recent analysis, not the most
        // recent notified one.
        self.signals.record(symbol, verdict);

        Ok(if delivered > 0 {
            SymbolOutcome::Notified(delivered)
        } else {
            SymbolOutcome::Recorded
        })
    }

    fn recipients(&self, symbol: &str) -> Vec<i64> {
        let mut chats: BTreeSet<i64> = self.subscriptions.subscribers(symbol).into_iter().collect();
        if let Some(admin) = self.admin_chat_id {
            chats.insert(admin);
        }
        chats.into_iter().collect()
    }
}
