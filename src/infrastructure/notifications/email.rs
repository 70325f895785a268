use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::ports::channel::{ChannelError, NotificationChannel};
use crate::domain::value_objects::ChannelKind;

const SUBJECT: &str = "Vilert device alert";

/// Sends alerts as plain-text email over async SMTP (STARTTLS).
pub struct EmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailChannel {
    /// Creates a channel over an SMTP relay.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::ChannelUnavailable` if the relay definition
    /// is invalid (e.g. unresolvable host syntax).
    pub fn new(
        host: &str,
        port: u16,
        credentials: Option<(String, String)>,
        from_address: String,
    ) -> Result<Self, ChannelError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| ChannelError::ChannelUnavailable(format!("SMTP relay: {e}")))?
            .port(port);

        if let Some((username, password)) = credentials {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from_address,
        })
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, address: &str, message: &str) -> Result<(), ChannelError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| ChannelError::SendFailed(format!("bad from address: {e}")))?,
            )
            .to(address
                .parse()
                .map_err(|e| ChannelError::SendFailed(format!("bad recipient address: {e}")))?)
            .subject(SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(message.to_string())
            .map_err(|e| ChannelError::SendFailed(format!("message build: {e}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;

        Ok(())
    }
}
