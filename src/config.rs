use std::env;

use tracing::warn;

use crate::models::DEFAULT_ALERT_THRESHOLD;

#[derive(Debug, Clone)]
pub struct Settings {
    pub binance_api_url: String,
    pub telegram_api_url: String,
    pub telegram_bot_token: String,

    pub check_interval_secs: u64,
    pub alert_threshold: f64,

    pub watchlist: Vec<WatchEntry>,
}

/// One `user_id:SYMBOL` pair seeded from the `WATCHLIST` env var.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEntry {
    pub user_id: i64,
    pub symbol: String,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let binance_api_url = env::var("BINANCE_API_URL")
        .unwrap_or_else(|_| "https://api.binance.com".to_string());

    let telegram_api_url = env::var("TELEGRAM_API_URL")
        .unwrap_or_else(|_| "https://api.telegram.org".to_string());

    let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default();

    let check_interval_secs = env::var("CHECK_INTERVAL")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(60);

    let alert_threshold = env::var("ALERT_THRESHOLD")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(DEFAULT_ALERT_THRESHOLD);

    let watchlist = parse_watchlist(&env::var("WATCHLIST").unwrap_or_default());

    Settings {
        binance_api_url,
        telegram_api_url,
        telegram_bot_token,
        check_interval_secs,
        alert_threshold,
        watchlist,
    }
}

/// Parse `WATCHLIST` entries of the form `user_id:SYMBOL`, comma separated,
/// e.g. `123456:BTCUSDT,123456:ETHUSDT,789:SOLUSDT`.
///
/// Malformed entries are skipped with a warning so one typo does not take
/// the rest of the list down with it.
pub fn parse_watchlist(raw: &str) -> Vec<WatchEntry> {
    let mut entries = Vec::new();

    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let Some((user, symbol)) = part.split_once(':') else {
            warn!("ignoring malformed WATCHLIST entry {part:?}");
            continue;
        };

        let Ok(user_id) = user.trim().parse::<i64>() else {
            warn!("ignoring malformed WATCHLIST entry {part:?}");
            continue;
        };

        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            warn!("ignoring malformed WATCHLIST entry {part:?}");
            continue;
        }

        entries.push(WatchEntry { user_id, symbol });
    }

    entries
}
