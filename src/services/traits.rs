use async_trait::async_trait;

use crate::error::PriceWatchError;

/// Quote provider consumed by the registry (seed fetch) and the polling loop.
///
/// Implementations must return an error, never a default price, on network
/// failure, non-success status or an unparsable payload, so callers can tell
/// "no data yet" apart from "price is zero".
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<f64, PriceWatchError>;
}

/// Outbound message channel for alerts.
///
/// Fire-and-forget from the core's perspective: the polling loop logs a
/// delivery failure and moves on, it never retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, user_id: i64, text: &str) -> Result<(), PriceWatchError>;
}
