use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ChannelKind;

/// One alert recipient with an optional address per notification channel.
///
/// Loaded from static configuration; a recipient with no populated address
/// is rejected at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

impl Recipient {
    /// The address this recipient uses on the given channel, if any.
    #[must_use]
    pub fn address_for(&self, kind: ChannelKind) -> Option<&str> {
        match kind {
            ChannelKind::Sms => self.phone.as_deref(),
            ChannelKind::Email => self.email.as_deref(),
            ChannelKind::Chat => self.chat_id.as_deref(),
        }
    }

    /// True when at least one channel address is populated.
    #[must_use]
    pub fn has_any_address(&self) -> bool {
        self.phone.is_some() || self.email.is_some() || self.chat_id.is_some()
    }

    /// Label used in logs: the configured name, or the first address.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.phone.as_deref())
            .or(self.email.as_deref())
            .or(self.chat_id.as_deref())
            .unwrap_or("<empty recipient>")
    }
}
