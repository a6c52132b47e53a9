use super::Notify;
use crate::error::{notify_error, BotResult};
use async_trait::async_trait;
use reqwest::{multipart, Client};
use std::path::Path;
use std::time::Duration;

const API_BASE: &str = "https://api.telegram.org";

/// Timeout for a single Bot API call
const SEND_TIMEOUT_SECS: u64 = 15;

/// Notifier backed by the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    token: String,
}

impl TelegramNotifier {
    pub fn new(token: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, token }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    async fn check_response(response: reqwest::Response) -> BotResult<()> {
        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(notify_error(&format!(
            "Telegram API returned HTTP {} - {}",
            status, body
        )))
    }
}

#[async_trait]
impl Notify for TelegramNotifier {
    async fn send_text(&self, chat_id: i64, text: &str) -> BotResult<()> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "HTML",
            }))
            .send()
            .await
            .map_err(|e| notify_error(&format!("Failed to send message: {}", e)))?;

        Self::check_response(response).await
    }

    async fn send_photo(&self, chat_id: i64, photo: &Path, caption: &str) -> BotResult<()> {
        let bytes = tokio::fs::read(photo).await?;
        let file_name = photo
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("photo.jpg")
            .to_string();

        let form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .text("parse_mode", "HTML")
            .part("photo", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| notify_error(&format!("Failed to send photo: {}", e)))?;

        Self::check_response(response).await
    }
}
