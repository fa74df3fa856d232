use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::PriceWatchError;
use crate::services::traits::PriceSource;

#[derive(Clone)]
pub struct BinanceClient {
    http: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub async fn ticker_price(&self, symbol: &str) -> Result<f64, PriceWatchError> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        let res = self
            .http
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| PriceWatchError::Fetch(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(PriceWatchError::Fetch(format!(
                "Binance ticker failed: {status} {body}"
            )));
        }

        let ticker = res
            .json::<TickerPrice>()
            .await
            .map_err(|e| PriceWatchError::Fetch(e.to_string()))?;

        // Binance serializes the price as a decimal string
        let price = ticker.price.parse::<f64>().map_err(|e| {
            PriceWatchError::Fetch(format!("bad price {:?} for {symbol}: {e}", ticker.price))
        })?;

        if !price.is_finite() {
            return Err(PriceWatchError::Fetch(format!(
                "non-finite price for {symbol}"
            )));
        }

        Ok(price)
    }
}

#[async_trait]
impl PriceSource for BinanceClient {
    async fn fetch_price(&self, symbol: &str) -> Result<f64, PriceWatchError> {
        self.ticker_price(symbol).await
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}
