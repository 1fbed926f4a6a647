use crate::models::*;
use serde::{Deserialize, Serialize};

/// Events emitted by the price poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PriceEvent {
    /// A fresh snapshot of live prices.
    Snapshot(PriceSnapshot),
    /// History for the watched symbol, refreshed on every tick.
    History(PriceHistory),
    /// A fetch failed. The poller keeps running.
    Failed { fetch: PriceFetch, message: String },
}

/// Which of the two per-tick requests an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceFetch {
    Snapshot,
    History,
}
