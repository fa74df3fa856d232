use thiserror::Error;

/// Errors surfaced by the monitoring core.
///
/// Fetch and notify failures are recovered locally inside the polling loop;
/// they only reach callers through `MonitorRegistry::create`, where a failed
/// seed fetch aborts monitor creation.
#[derive(Error, Debug)]
pub enum PriceWatchError {
    #[error("price fetch failed: {0}")]
    Fetch(String),

    #[error("notification failed: {0}")]
    Notify(String),

    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),
}
