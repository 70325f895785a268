use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::channel::{ChannelError, NotificationChannel};
use crate::domain::value_objects::ChannelKind;

/// Sends alerts as WhatsApp messages through the Twilio Messages API.
///
/// The recipient address is a phone number in E.164 form; Twilio requires
/// the `whatsapp:` prefix on both ends, which this channel adds itself.
pub struct WhatsAppChannel {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl WhatsAppChannel {
    /// Creates a channel with a timeout-bounded HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::ChannelUnavailable` if the HTTP client cannot
    /// be initialized.
    pub fn new(
        account_sid: String,
        auth_token: String,
        from_number: String,
    ) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                ChannelError::ChannelUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            account_sid,
            auth_token,
            from_number,
        })
    }

    fn api_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }

    fn form_params(&self, to: &str, body: &str) -> [(&'static str, String); 3] {
        [
            ("From", format!("whatsapp:{}", self.from_number)),
            ("To", format!("whatsapp:{to}")),
            ("Body", body.to_string()),
        ]
    }
}

#[async_trait]
impl NotificationChannel for WhatsAppChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    fn name(&self) -> &'static str {
        "whatsapp"
    }

    async fn send(&self, address: &str, message: &str) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(self.api_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&self.form_params(address, message))
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed(format!(
                "Twilio API HTTP {status}: {body}"
            )));
        }

        Ok(())
    }
}
