use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::ports::channel::{ChannelError, NotificationChannel};
use crate::domain::value_objects::ChannelKind;

/// Sends alerts through the Telegram Bot API.
///
/// The recipient address is a chat id; delivery is one `sendMessage` call
/// per alert. Telegram reports application-level failures in the response
/// body (`ok: false`), which this channel surfaces as a send failure.
pub struct TelegramChannel {
    client: reqwest::Client,
    bot_token: String,
}

impl TelegramChannel {
    /// Creates a channel with a timeout-bounded HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::ChannelUnavailable` if the HTTP client cannot
    /// be initialized (e.g. TLS backend failure).
    pub fn new(bot_token: String) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                ChannelError::ChannelUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, bot_token })
    }

    fn api_url(&self) -> String {
        format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token)
    }

    fn payload(chat_id: &str, text: &str) -> Value {
        json!({
            "chat_id": chat_id,
            "text": text,
        })
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Chat
    }

    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, address: &str, message: &str) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(self.api_url())
            .json(&Self::payload(address, message))
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| ChannelError::SendFailed(format!("unreadable response: {e}")))?;

        if !status.is_success() || body.get("ok").and_then(Value::as_bool) != Some(true) {
            let description = body
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("no description");
            return Err(ChannelError::SendFailed(format!(
                "Telegram API error (HTTP {status}): {description}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_name() {
        let channel = TelegramChannel::new("token".to_string()).expect("build channel");
        assert_eq!(channel.kind(), ChannelKind::Chat);
        assert_eq!(channel.name(), "telegram");
    }

    #[test]
    fn api_url_embeds_bot_token() {
        let channel = TelegramChannel::new("123:abc".to_string()).expect("build channel");
        assert_eq!(
            channel.api_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn payload_has_chat_id_and_text() {
        let payload = TelegramChannel::payload("42", "humidity low");
        assert_eq!(payload["chat_id"], "42");
        assert_eq!(payload["text"], "humidity low");
    }
}
