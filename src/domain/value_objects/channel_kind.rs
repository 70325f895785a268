use serde::{Deserialize, Serialize};

/// Kind of outbound notification channel a recipient address belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Phone-number based messaging (WhatsApp via Twilio)
    Sms,
    Email,
    /// Chat-id based messaging (Telegram)
    Chat,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sms => write!(f, "sms"),
            Self::Email => write!(f, "email"),
            Self::Chat => write!(f, "chat"),
        }
    }
}
