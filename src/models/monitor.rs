use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

/// Percentage move that triggers an alert unless overridden via config.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 1.0;

/// One user's watch on one symbol.
///
/// `last_price` is written only by the single check task that owns this
/// monitor within a tick (or by the registry before the monitor is shared).
/// `is_active` is a one-way tombstone: removal flips it to false before the
/// registry entry is unlinked, so a check already holding this monitor
/// observes the deactivation and skips the alert step.
#[derive(Debug)]
pub struct Monitor {
    pub user_id: i64,
    pub symbol: String,

    pub alert_threshold: f64,
    pub created_at: i64,

    last_price: Mutex<Option<f64>>,
    is_active: AtomicBool,
}

impl Monitor {
    pub fn new(user_id: i64, symbol: String, alert_threshold: f64) -> Self {
        Self {
            user_id,
            symbol,
            alert_threshold,
            created_at: Utc::now().timestamp(),
            last_price: Mutex::new(None),
            is_active: AtomicBool::new(true),
        }
    }

    /// Most recently observed price; `None` before the first successful fetch.
    pub fn last_price(&self) -> Option<f64> {
        *self.last_price.lock().unwrap()
    }

    pub(crate) fn set_last_price(&self, price: f64) {
        *self.last_price.lock().unwrap() = Some(price);
    }

    pub fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }

    /// One-way: there is no path back to active.
    pub(crate) fn deactivate(&self) {
        self.is_active.store(false, Ordering::SeqCst);
    }
}
