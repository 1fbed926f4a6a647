//! Live price poller.
//!
//! Fetches the price snapshot and the recent history of one symbol on a fixed
//! interval and forwards the results as [`PriceEvent`]s. The first fetch runs
//! as soon as the poller starts.

use bharatbit_core::{PriceApi, PriceEvent, PriceFetch};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const DEFAULT_REFRESH: Duration = Duration::from_secs(60);
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

/// Poller configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Symbol to watch, e.g. `"USDT"`.
    pub symbol: String,
    pub refresh: Duration,
    pub history_days: u32,
    /// Capacity of the event channel.
    pub buffer: usize,
}

impl PollerConfig {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().to_ascii_uppercase(),
            refresh: DEFAULT_REFRESH,
            history_days: DEFAULT_HISTORY_DAYS,
            buffer: 16,
        }
    }
}

pub struct PricePoller {
    api: Arc<dyn PriceApi>,
    token: String,
    config: PollerConfig,
}

impl PricePoller {
    pub fn new(api: Arc<dyn PriceApi>, token: impl Into<String>, config: PollerConfig) -> Self {
        Self {
            api,
            token: token.into(),
            config,
        }
    }

    /// Start polling on the current runtime.
    pub fn spawn(self) -> (PollerHandle, mpsc::Receiver<PriceEvent>) {
        let (events, rx) = mpsc::channel(self.config.buffer.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        info!(
            symbol = %self.config.symbol,
            refresh_secs = self.config.refresh.as_secs(),
            "Starting price poller"
        );
        let task = tokio::spawn(self.run(events, shutdown_rx));
        let handle = PollerHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        };
        (handle, rx)
    }

    async fn run(self, events: mpsc::Sender<PriceEvent>, mut shutdown: oneshot::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.config.refresh);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if !self.poll_once(&events).await {
                        debug!(symbol = %self.config.symbol, "Price listener gone");
                        break;
                    }
                }
            }
        }
        info!(symbol = %self.config.symbol, "Price poller stopped");
    }

    /// One refresh. Returns `false` once nobody is listening.
    async fn poll_once(&self, events: &mpsc::Sender<PriceEvent>) -> bool {
        let symbols = [self.config.symbol.clone()];
        let (snapshot, history) = tokio::join!(
            self.api.prices(&self.token, &symbols),
            self.api
                .price_history(&self.token, &self.config.symbol, self.config.history_days),
        );

        let snapshot = match snapshot {
            Ok(snapshot) => PriceEvent::Snapshot(snapshot),
            Err(e) => {
                warn!(symbol = %self.config.symbol, error = %e, "Price fetch failed");
                PriceEvent::Failed {
                    fetch: PriceFetch::Snapshot,
                    message: e.to_string(),
                }
            }
        };
        let history = match history {
            Ok(history) => PriceEvent::History(history),
            Err(e) => {
                warn!(symbol = %self.config.symbol, error = %e, "Price history fetch failed");
                PriceEvent::Failed {
                    fetch: PriceFetch::History,
                    message: e.to_string(),
                }
            }
        };

        events.send(snapshot).await.is_ok() && events.send(history).await.is_ok()
    }
}

/// Owner of a running poller. Dropping the handle aborts the task.
pub struct PollerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Signal shutdown and wait for the task to finish.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "Price poller task failed");
                }
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bharatbit_core::{ApiError, ApiResult, LivePrice, PriceHistory, PricePoint, PriceSnapshot};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPrices {
        price_calls: AtomicUsize,
        history_calls: AtomicUsize,
        fail_history: bool,
    }

    #[async_trait]
    impl PriceApi for CountingPrices {
        async fn prices(&self, _token: &str, symbols: &[String]) -> ApiResult<PriceSnapshot> {
            self.price_calls.fetch_add(1, Ordering::SeqCst);
            let mut prices = HashMap::new();
            for symbol in symbols {
                prices.insert(
                    symbol.clone(),
                    LivePrice {
                        usd: dec!(1.0),
                        inr: dec!(89.5),
                        usd_24h_change: dec!(0.01),
                        inr_24h_change: dec!(0.02),
                        last_updated: None,
                    },
                );
            }
            Ok(PriceSnapshot {
                prices,
                supported_symbols: symbols.to_vec(),
            })
        }

        async fn price_history(
            &self,
            _token: &str,
            symbol: &str,
            days: u32,
        ) -> ApiResult<PriceHistory> {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_history {
                return Err(ApiError::Api {
                    status: 404,
                    message: "Unsupported symbol".to_string(),
                });
            }
            Ok(PriceHistory {
                symbol: symbol.to_string(),
                days,
                data: vec![PricePoint {
                    timestamp: 1_700_000_000_000,
                    price: dec!(89.4),
                    date: None,
                    time: None,
                }],
            })
        }
    }

    fn poller(api: Arc<CountingPrices>) -> PricePoller {
        PricePoller::new(api, "tok", PollerConfig::new("usdt"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_is_immediate() {
        let api = Arc::new(CountingPrices::default());
        let (handle, mut rx) = poller(api.clone()).spawn();

        match rx.recv().await {
            Some(PriceEvent::Snapshot(s)) => assert_eq!(s.prices["USDT"].inr, dec!(89.5)),
            other => panic!("expected snapshot, got {other:?}"),
        }
        match rx.recv().await {
            Some(PriceEvent::History(h)) => {
                assert_eq!(h.symbol, "USDT");
                assert_eq!(h.days, DEFAULT_HISTORY_DAYS);
            }
            other => panic!("expected history, got {other:?}"),
        }
        assert_eq!(api.price_calls.load(Ordering::SeqCst), 1);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_every_interval() {
        let api = Arc::new(CountingPrices::default());
        let (handle, mut rx) = poller(api.clone()).spawn();

        for _ in 0..6 {
            assert!(rx.recv().await.is_some());
        }
        assert_eq!(api.price_calls.load(Ordering::SeqCst), 3);
        assert_eq!(api.history_calls.load(Ordering::SeqCst), 3);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_polling() {
        let api = Arc::new(CountingPrices {
            fail_history: true,
            ..Default::default()
        });
        let (handle, mut rx) = poller(api.clone()).spawn();

        assert!(matches!(rx.recv().await, Some(PriceEvent::Snapshot(_))));
        match rx.recv().await {
            Some(PriceEvent::Failed {
                fetch: PriceFetch::History,
                message,
            }) => assert!(message.contains("Unsupported")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(matches!(rx.recv().await, Some(PriceEvent::Snapshot(_))));
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fetches_after_stop() {
        let api = Arc::new(CountingPrices::default());
        let (handle, mut rx) = poller(api.clone()).spawn();
        rx.recv().await;
        rx.recv().await;

        handle.stop().await;
        let calls = api.price_calls.load(Ordering::SeqCst);
        tokio::time::sleep(DEFAULT_REFRESH * 10).await;

        assert_eq!(api.price_calls.load(Ordering::SeqCst), calls);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fetches_after_drop() {
        let api = Arc::new(CountingPrices::default());
        let (handle, mut rx) = poller(api.clone()).spawn();
        rx.recv().await;
        rx.recv().await;

        drop(handle);
        let calls = api.price_calls.load(Ordering::SeqCst);
        tokio::time::sleep(DEFAULT_REFRESH * 10).await;

        assert_eq!(api.price_calls.load(Ordering::SeqCst), calls);
        assert_eq!(api.history_calls.load(Ordering::SeqCst), calls);
    }
}
