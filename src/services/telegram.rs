use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::PriceWatchError;
use crate::services::traits::Notifier;

/// Thin wrapper over the Telegram Bot API `sendMessage` call.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    base_url: String,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(base_url: String, bot_token: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            bot_token,
        }
    }

    fn has_token(&self) -> bool {
        !self.bot_token.trim().is_empty()
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), PriceWatchError> {
        if !self.has_token() {
            return Err(PriceWatchError::Notify(
                "TELEGRAM_BOT_TOKEN is missing in .env".to_string(),
            ));
        }

        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let res = self
            .http
            .post(&url)
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .map_err(|e| PriceWatchError::Notify(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(PriceWatchError::Notify(format!(
                "Telegram sendMessage failed: {status} {body}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send(&self, user_id: i64, text: &str) -> Result<(), PriceWatchError> {
        self.send_message(user_id, text).await
    }
}
