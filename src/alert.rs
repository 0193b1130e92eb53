//! Emergency alert delivery via the Telegram Bot API
//!
//! One fixed recipient, one outbound message per trigger. No retry and no
//! deduplication: a second button press is a second alert.

use async_trait::async_trait;
use chrono::Local;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::{Error, Result};

const API_BASE: &str = "https://api.telegram.org/bot";

/// Notifies the configured emergency contact
#[async_trait]
pub trait NotifyContact: Send + Sync {
    /// Send one emergency alert stamped with the current time
    ///
    /// # Errors
    ///
    /// Returns error if the messaging API rejects or cannot be reached.
    async fn send_alert(&self) -> Result<()>;
}

/// Telegram-backed alert notifier
pub struct AlertNotifier {
    client: reqwest::Client,
    token: SecretString,
    chat_id: String,
}

impl AlertNotifier {
    /// Create a notifier for one fixed recipient chat
    #[must_use]
    pub fn new(token: SecretString, chat_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            chat_id,
        }
    }

    /// Fixed-format alert body with a second-resolution timestamp
    #[must_use]
    pub fn format_alert_message() -> String {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S");
        format!("🚨 긴급 상황 발생!\n\n발생 시간: {now}\n상황: 긴급 도움 요청\n")
    }
}

#[async_trait]
impl NotifyContact for AlertNotifier {
    async fn send_alert(&self) -> Result<()> {
        let url = format!("{API_BASE}{}/sendMessage", self.token.expose_secret());

        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text: Self::format_alert_message(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Alert(format!("Telegram API error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Alert(format!(
                "Telegram API error: {status} - {body}"
            )));
        }

        tracing::info!(chat_id = %self.chat_id, "emergency alert sent");
        Ok(())
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn alert_message_embeds_current_timestamp() {
        let before = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let message = AlertNotifier::format_alert_message();
        let after = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let stamp = message
            .lines()
            .find_map(|line| line.strip_prefix("발생 시간: "))
            .expect("alert message carries a timestamp line");

        // Parses in the fixed format and matches the call time to the second
        NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").unwrap();
        assert!(stamp >= before.as_str() && stamp <= after.as_str());
    }

    #[test]
    fn alert_message_has_fixed_description() {
        let message = AlertNotifier::format_alert_message();
        assert!(message.starts_with("🚨 긴급 상황 발생!"));
        assert!(message.contains("상황: 긴급 도움 요청"));
    }
}
