use std::time::Duration;

use futures_util::future;
use tokio::time;
use tracing::{debug, error, warn};

use crate::AppState;
use crate::models::Monitor;

/// Spawn the background loop that checks every active monitor on a fixed
/// interval. The loop never terminates; a tick that fails is logged and the
/// next one runs on schedule.
pub fn spawn_price_monitor(state: AppState) {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(state.settings.check_interval_secs));

        loop {
            interval.tick().await;

            // each tick runs in its own task so a failure in the tick
            // orchestration itself cannot take the loop down
            let tick = tokio::spawn(run_tick(state.clone()));
            if let Err(e) = tick.await {
                error!("[price-monitor] tick failed: {e}");
            }
        }
    });
}

/// One fetch-compare-alert cycle over a snapshot of the active monitors.
///
/// Every monitor is checked in its own task; a slow or failing check never
/// delays or cancels its siblings.
pub async fn run_tick(state: AppState) {
    let monitors = state.registry.active_monitors().await;
    if monitors.is_empty() {
        return;
    }

    debug!("[price-monitor] checking {} monitors", monitors.len());

    let checks: Vec<_> = monitors
        .into_iter()
        .map(|monitor| {
            let state = state.clone();
            tokio::spawn(async move { check_monitor(&state, &monitor).await })
        })
        .collect();

    for check in future::join_all(checks).await {
        if let Err(e) = check {
            error!("[price-monitor] check task failed: {e}");
        }
    }
}

/// Check one monitor: fetch the current price, compare against the previous
/// observation, alert on a threshold breach, then record the fetched price.
pub async fn check_monitor(state: &AppState, monitor: &Monitor) {
    if !monitor.is_active() {
        return;
    }

    let current = match state.price_source.fetch_price(&monitor.symbol).await {
        Ok(price) => price,
        Err(e) => {
            // leave last_price as it was; next tick gets a fresh shot
            warn!("[price-monitor] fetch failed for {}: {e}", monitor.symbol);
            return;
        }
    };

    let Some(previous) = monitor.last_price() else {
        // first successful observation, nothing to compare against
        monitor.set_last_price(current);
        return;
    };

    let change_percent = (current - previous) * 100.0 / previous;

    if change_percent.abs() >= monitor.alert_threshold {
        // removal may have landed while the fetch was in flight
        if monitor.is_active() {
            let text = format_alert(&monitor.symbol, change_percent, current);
            if let Err(e) = state.notifier.send(monitor.user_id, &text).await {
                warn!(
                    "[price-monitor] alert delivery failed for user {}: {e}",
                    monitor.user_id
                );
            }
        }
    }

    // measure the next tick against this observation, not a moving baseline
    monitor.set_last_price(current);
}

fn format_alert(symbol: &str, change_percent: f64, price: f64) -> String {
    let direction = if change_percent > 0.0 { "Up" } else { "Down" };
    format!(
        "{direction} alert for {symbol}: {:.2}% over last interval, price now {:.4}",
        change_percent.abs(),
        price
    )
}
