use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use tokio::sync::RwLock;

use crate::error::PriceWatchError;
use crate::models::Monitor;
use crate::services::traits::PriceSource;

fn is_valid_symbol(s: &str) -> bool {
    let re = Regex::new(r"^[A-Z0-9]{2,20}$").unwrap();
    re.is_match(s)
}

/// Process-wide monitor state, keyed `user_id -> symbol -> Monitor`.
///
/// At most one live monitor exists per `(user_id, symbol)` pair; creating
/// over an existing pair replaces it. The registry is shared between the
/// command layer and the polling loop, so the map sits behind a lock and
/// monitors are handed out as `Arc` clones.
pub struct MonitorRegistry {
    source: Arc<dyn PriceSource>,
    default_threshold: f64,
    monitors: RwLock<HashMap<i64, HashMap<String, Arc<Monitor>>>>,
}

impl MonitorRegistry {
    pub fn new(source: Arc<dyn PriceSource>, default_threshold: f64) -> Self {
        Self {
            source,
            default_threshold,
            monitors: RwLock::new(HashMap::new()),
        }
    }

    /// Start watching `symbol` for `user_id`.
    ///
    /// Seeds `last_price` with one fetch before registering; if that fetch
    /// fails no monitor is created and the fetch error propagates. Replaces
    /// (and tombstones) any previous monitor under the same key.
    pub async fn create(
        &self,
        user_id: i64,
        symbol: &str,
    ) -> Result<Arc<Monitor>, PriceWatchError> {
        let sym = symbol.trim().to_uppercase();
        if !is_valid_symbol(&sym) {
            return Err(PriceWatchError::InvalidSymbol(sym));
        }

        let price = self.source.fetch_price(&sym).await?;

        let monitor = Arc::new(Monitor::new(user_id, sym.clone(), self.default_threshold));
        monitor.set_last_price(price);

        let mut monitors = self.monitors.write().await;
        if let Some(prev) = monitors
            .entry(user_id)
            .or_default()
            .insert(sym, Arc::clone(&monitor))
        {
            // the replaced instance may still sit in a tick snapshot
            prev.deactivate();
        }

        Ok(monitor)
    }

    /// Monitors owned by one user, keyed by symbol. Empty for unknown users.
    pub async fn user_monitors(&self, user_id: i64) -> HashMap<String, Arc<Monitor>> {
        let monitors = self.monitors.read().await;
        monitors.get(&user_id).cloned().unwrap_or_default()
    }

    /// Stop watching `symbol` for `user_id`; false if no such monitor exists.
    ///
    /// The tombstone flag is flipped before the entry is unlinked so a check
    /// already holding this monitor observes the deactivation.
    pub async fn remove(&self, user_id: i64, symbol: &str) -> bool {
        let sym = symbol.trim().to_uppercase();

        let mut monitors = self.monitors.write().await;
        let Some(user_map) = monitors.get_mut(&user_id) else {
            return false;
        };
        let Some(monitor) = user_map.get(&sym) else {
            return false;
        };

        monitor.deactivate();
        user_map.remove(&sym);
        if user_map.is_empty() {
            monitors.remove(&user_id);
        }

        true
    }

    /// Point-in-time copy of every monitor currently flagged active, across
    /// all users. Later mutations are not reflected; the polling loop works
    /// off this snapshot for one tick.
    pub async fn active_monitors(&self) -> Vec<Arc<Monitor>> {
        let monitors = self.monitors.read().await;
        monitors
            .values()
            .flat_map(|per_user| per_user.values())
            .filter(|m| m.is_active())
            .cloned()
            .collect()
    }
}
