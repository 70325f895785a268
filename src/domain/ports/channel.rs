use async_trait::async_trait;
use thiserror::Error;

use crate::domain::value_objects::ChannelKind;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
}

/// Uniform outbound notification capability.
///
/// Concrete transports (Telegram, SMTP, Twilio) live in infrastructure;
/// the dispatcher only sees `send(address, message)` plus the channel kind
/// used to pick the matching recipient address.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Which recipient address field this channel consumes.
    fn kind(&self) -> ChannelKind;

    /// Human-readable channel name for logs.
    fn name(&self) -> &'static str;

    /// Deliver one message to one address.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError` if delivery fails or the transport is
    /// unavailable. Failures are isolated per attempt by the dispatcher.
    async fn send(&self, address: &str, message: &str) -> Result<(), ChannelError>;
}
