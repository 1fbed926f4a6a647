use crate::display::{format_change, format_inr, format_usd, sparkline};
use crate::{AppState, Banner};
use bharatbit_core::{LivePrice, PriceEvent, PriceFetch, PricePoint};
use bharatbit_feed::{PollerConfig, PollerHandle, PricePoller};
use tokio::sync::mpsc;
use tracing::debug;

/// Live price card for one symbol. Polls while mounted.
pub struct PriceCard {
    pub symbol: String,
    pub price: Option<LivePrice>,
    pub history: Vec<PricePoint>,
    pub loading: bool,
    pub banner: Option<Banner>,
    config: PollerConfig,
    poller: Option<(PollerHandle, mpsc::Receiver<PriceEvent>)>,
}

impl PriceCard {
    pub fn new(symbol: &str) -> Self {
        Self::with_config(PollerConfig::new(symbol))
    }

    pub fn with_config(config: PollerConfig) -> Self {
        Self {
            symbol: config.symbol.clone(),
            price: None,
            history: Vec::new(),
            loading: true,
            banner: None,
            config,
            poller: None,
        }
    }

    /// Start polling. Mounting twice keeps the running poller.
    pub fn mount(&mut self, app: &AppState) -> bool {
        if self.poller.is_some() {
            return true;
        }
        match app.token() {
            Ok(token) => {
                let poller = PricePoller::new(app.prices.clone(), token, self.config.clone());
                self.poller = Some(poller.spawn());
                true
            }
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message("Please log in again")));
                false
            }
        }
    }

    /// Stop polling and wait for the poller to exit.
    pub async fn unmount(&mut self) {
        if let Some((handle, _events)) = self.poller.take() {
            handle.stop().await;
            debug!(symbol = %self.symbol, "Price card unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.poller.is_some()
    }

    /// Wait for the next poller event and apply it. `false` when unmounted.
    pub async fn next_event(&mut self) -> bool {
        let Some((_, events)) = self.poller.as_mut() else {
            return false;
        };
        match events.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Apply every event already delivered without waiting.
    pub fn drain(&mut self) {
        let mut pending = Vec::new();
        if let Some((_, events)) = self.poller.as_mut() {
            while let Ok(event) = events.try_recv() {
                pending.push(event);
            }
        }
        for event in pending {
            self.apply(event);
        }
    }

    /// A failed fetch blanks the part it was for.
    pub fn apply(&mut self, event: PriceEvent) {
        self.loading = false;
        match event {
            PriceEvent::Snapshot(mut snapshot) => {
                self.price = snapshot.prices.remove(&self.symbol);
            }
            PriceEvent::History(history) => self.history = history.data,
            PriceEvent::Failed {
                fetch: PriceFetch::Snapshot,
                ..
            } => self.price = None,
            PriceEvent::Failed {
                fetch: PriceFetch::History,
                ..
            } => self.history.clear(),
        }
    }

    // -- Display -------------------------------------------------------------

    pub fn price_inr(&self) -> String {
        format_inr(self.price.as_ref().map(|p| p.inr).unwrap_or_default())
    }

    pub fn price_usd(&self) -> String {
        format_usd(self.price.as_ref().map(|p| p.usd).unwrap_or_default())
    }

    pub fn change(&self) -> String {
        format_change(self.price.as_ref().map(|p| p.inr_24h_change).unwrap_or_default())
    }

    pub fn is_up(&self) -> bool {
        self.price
            .as_ref()
            .map_or(true, |p| !p.inr_24h_change.is_sign_negative())
    }

    /// Needs at least two points.
    pub fn sparkline(&self) -> String {
        if self.history.len() < 2 {
            return String::new();
        }
        sparkline(&self.history)
    }
}
