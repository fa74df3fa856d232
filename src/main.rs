use std::sync::Arc;

use pricewatch::services::PriceSource;
use pricewatch::services::binance::BinanceClient;
use pricewatch::services::monitor_registry::MonitorRegistry;
use pricewatch::services::telegram::TelegramClient;
use pricewatch::{AppState, alert_monitor, config};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    let binance = BinanceClient::new(settings.binance_api_url.clone());
    let telegram = TelegramClient::new(
        settings.telegram_api_url.clone(),
        settings.telegram_bot_token.clone(),
    );

    let price_source: Arc<dyn PriceSource> = Arc::new(binance);
    let registry = Arc::new(MonitorRegistry::new(
        Arc::clone(&price_source),
        settings.alert_threshold,
    ));

    let state = AppState {
        settings: settings.clone(),
        registry,
        price_source,
        notifier: Arc::new(telegram),
    };

    // the chat-command surface lives outside this process; the standalone
    // binary seeds its monitors from WATCHLIST instead
    for entry in &settings.watchlist {
        match state.registry.create(entry.user_id, &entry.symbol).await {
            Ok(monitor) => tracing::info!(
                "watching {} for user {} (start price {:.4})",
                monitor.symbol,
                monitor.user_id,
                monitor.last_price().unwrap_or_default()
            ),
            Err(e) => tracing::error!(
                "could not watch {} for user {}: {e}",
                entry.symbol,
                entry.user_id
            ),
        }
    }

    alert_monitor::spawn_price_monitor(state.clone());
    tracing::info!(
        "price monitor running, checking every {}s",
        settings.check_interval_secs
    );

    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for ctrl-c");
    tracing::info!("shutting down");
}
