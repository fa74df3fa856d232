use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pricewatch::error::PriceWatchError;
use pricewatch::services::PriceSource;
use pricewatch::services::monitor_registry::MonitorRegistry;

/// In-memory quote provider: programmable prices, per-symbol failure
/// injection, and a record of every fetch it served.
struct FakePriceSource {
    prices: Mutex<HashMap<String, f64>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakePriceSource {
    fn new() -> Self {
        Self {
            prices: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn set_price(&self, symbol: &str, price: f64) {
        self.prices.lock().unwrap().insert(symbol.to_string(), price);
    }

    fn fail(&self, symbol: &str) {
        self.failing.lock().unwrap().insert(symbol.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for FakePriceSource {
    async fn fetch_price(&self, symbol: &str) -> Result<f64, PriceWatchError> {
        self.calls.lock().unwrap().push(symbol.to_string());

        if self.failing.lock().unwrap().contains(symbol) {
            return Err(PriceWatchError::Fetch(format!("no quote for {symbol}")));
        }

        self.prices
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .ok_or_else(|| PriceWatchError::Fetch(format!("unknown symbol {symbol}")))
    }
}

fn registry_with(prices: &[(&str, f64)]) -> (Arc<FakePriceSource>, MonitorRegistry) {
    let source = Arc::new(FakePriceSource::new());
    for (symbol, price) in prices {
        source.set_price(symbol, *price);
    }

    let dyn_source: Arc<dyn PriceSource> = source.clone();
    let registry = MonitorRegistry::new(dyn_source, 1.0);

    (source, registry)
}

#[tokio::test]
async fn create_seeds_last_price_and_is_active() {
    let (_source, registry) = registry_with(&[("BTCUSDT", 50000.0)]);

    let monitor = registry.create(42, "BTCUSDT").await.unwrap();

    assert_eq!(monitor.user_id, 42);
    assert_eq!(monitor.symbol, "BTCUSDT");
    assert_eq!(monitor.last_price(), Some(50000.0));
    assert_eq!(monitor.alert_threshold, 1.0);
    assert!(monitor.is_active());
}

#[tokio::test]
async fn create_normalizes_symbol_to_uppercase() {
    let (_source, registry) = registry_with(&[("BTCUSDT", 50000.0)]);

    let monitor = registry.create(1, "  btcusdt ").await.unwrap();
    assert_eq!(monitor.symbol, "BTCUSDT");

    let monitors = registry.user_monitors(1).await;
    assert!(monitors.contains_key("BTCUSDT"));
}

#[tokio::test]
async fn create_fails_when_seed_fetch_fails() {
    let (source, registry) = registry_with(&[]);
    source.fail("BTCUSDT");

    let res = registry.create(1, "BTCUSDT").await;

    assert!(matches!(res, Err(PriceWatchError::Fetch(_))));
    assert!(registry.user_monitors(1).await.is_empty());
    assert!(registry.active_monitors().await.is_empty());
}

#[tokio::test]
async fn create_rejects_garbage_symbol_without_fetching() {
    let (source, registry) = registry_with(&[]);

    let res = registry.create(1, "BTC USDT").await;

    assert!(matches!(res, Err(PriceWatchError::InvalidSymbol(_))));
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn create_over_existing_pair_replaces_and_tombstones() {
    let (source, registry) = registry_with(&[("BTCUSDT", 50000.0)]);

    let first = registry.create(1, "BTCUSDT").await.unwrap();

    source.set_price("BTCUSDT", 51000.0);
    let second = registry.create(1, "BTCUSDT").await.unwrap();

    // old instance is dead, the key holds exactly one live monitor
    assert!(!first.is_active());
    assert!(second.is_active());
    assert_eq!(second.last_price(), Some(51000.0));

    let monitors = registry.user_monitors(1).await;
    assert_eq!(monitors.len(), 1);
    assert!(Arc::ptr_eq(&monitors["BTCUSDT"], &second));
}

#[tokio::test]
async fn user_monitors_is_empty_for_unknown_user() {
    let (_source, registry) = registry_with(&[]);
    assert!(registry.user_monitors(999).await.is_empty());
}

#[tokio::test]
async fn remove_is_idempotent() {
    let (_source, registry) = registry_with(&[("BTCUSDT", 50000.0)]);
    registry.create(1, "BTCUSDT").await.unwrap();

    assert!(registry.remove(1, "BTCUSDT").await);
    assert!(!registry.remove(1, "BTCUSDT").await);
    assert!(!registry.remove(2, "BTCUSDT").await);
    assert!(!registry.remove(1, "ETHUSDT").await);

    assert!(registry.user_monitors(1).await.is_empty());
}

#[tokio::test]
async fn remove_tombstones_before_unlinking() {
    let (_source, registry) = registry_with(&[("BTCUSDT", 50000.0)]);

    // held reference stands in for a snapshot taken by an in-flight tick
    let monitor = registry.create(1, "BTCUSDT").await.unwrap();
    assert!(monitor.is_active());

    assert!(registry.remove(1, "btcusdt").await);
    assert!(!monitor.is_active());
}

#[tokio::test]
async fn active_monitors_spans_all_users_and_skips_removed() {
    let (_source, registry) = registry_with(&[
        ("BTCUSDT", 50000.0),
        ("ETHUSDT", 3000.0),
        ("SOLUSDT", 150.0),
    ]);

    registry.create(1, "BTCUSDT").await.unwrap();
    registry.create(1, "ETHUSDT").await.unwrap();
    registry.create(2, "SOLUSDT").await.unwrap();
    registry.remove(1, "ETHUSDT").await;

    let active = registry.active_monitors().await;
    let mut keys: Vec<_> = active
        .iter()
        .map(|m| (m.user_id, m.symbol.clone()))
        .collect();
    keys.sort();

    assert_eq!(
        keys,
        vec![(1, "BTCUSDT".to_string()), (2, "SOLUSDT".to_string())]
    );
}

#[tokio::test]
async fn registry_reflects_create_remove_sequences() {
    let (_source, registry) = registry_with(&[("BTCUSDT", 50000.0), ("ETHUSDT", 3000.0)]);

    registry.create(1, "BTCUSDT").await.unwrap();
    registry.create(1, "ETHUSDT").await.unwrap();
    registry.remove(1, "BTCUSDT").await;
    registry.create(1, "BTCUSDT").await.unwrap();
    registry.remove(1, "ETHUSDT").await;

    let monitors = registry.user_monitors(1).await;
    let mut symbols: Vec<_> = monitors.keys().cloned().collect();
    symbols.sort();

    assert_eq!(symbols, vec!["BTCUSDT".to_string()]);
    assert!(monitors["BTCUSDT"].is_active());
}
