use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::domain::entities::breach::BreachDescriptor;
use crate::domain::entities::recipient::Recipient;
use crate::domain::ports::channel::NotificationChannel;

/// Per (device, recipient address) timestamp of the last successful alert.
///
/// An entry's existence means "an alert went out within the cooldown window
/// for this pair"; absence means "free to send". Entries are cleared for a
/// device as soon as an evaluation shows no breach, so the next incident
/// alerts immediately instead of honoring a stale window.
pub struct CooldownStore {
    last_sent: Mutex<HashMap<(String, String), DateTime<Utc>>>,
}

impl CooldownStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_sent: Mutex::new(HashMap::new()),
        }
    }

    /// True when no entry exists for the pair or the window has elapsed.
    #[must_use]
    pub fn may_send(
        &self,
        device_id: &str,
        address: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> bool {
        self.last_sent
            .lock()
            .get(&(device_id.to_string(), address.to_string()))
            .map_or(true, |last| now - *last >= window)
    }

    /// Record a successful send, creating or refreshing the entry.
    pub fn record(&self, device_id: &str, address: &str, at: DateTime<Utc>) {
        self.last_sent
            .lock()
            .insert((device_id.to_string(), address.to_string()), at);
    }

    /// Drop every entry for a device (all recipient addresses).
    pub fn clear_device(&self, device_id: &str) {
        self.last_sent
            .lock()
            .retain(|(device, _), _| device != device_id);
    }

    /// Last successful send for a pair, if any.
    #[must_use]
    pub fn last_sent(&self, device_id: &str, address: &str) -> Option<DateTime<Utc>> {
        self.last_sent
            .lock()
            .get(&(device_id.to_string(), address.to_string()))
            .copied()
    }
}

impl Default for CooldownStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Fans breach descriptors out to every recipient across every configured
/// channel, applying the cooldown policy per (device, address) pair.
pub struct AlertDispatcher {
    channels: Vec<Arc<dyn NotificationChannel>>,
    recipients: Vec<Recipient>,
    cooldowns: CooldownStore,
    cooldown_window: Duration,
}

impl AlertDispatcher {
    #[must_use]
    pub fn new(
        channels: Vec<Arc<dyn NotificationChannel>>,
        recipients: Vec<Recipient>,
        cooldown_window: Duration,
    ) -> Self {
        Self {
            channels,
            recipients,
            cooldowns: CooldownStore::new(),
            cooldown_window,
        }
    }

    /// Dispatch the breaches of the most recent reading for a device.
    pub async fn dispatch(&self, device_id: &str, breaches: &[BreachDescriptor]) {
        self.dispatch_at(device_id, breaches, Utc::now()).await;
    }

    /// Like [`dispatch`](Self::dispatch) with an explicit clock, so timing
    /// behavior is testable.
    pub async fn dispatch_at(
        &self,
        device_id: &str,
        breaches: &[BreachDescriptor],
        now: DateTime<Utc>,
    ) {
        if breaches.is_empty() {
            // Recovery: forget the device's cooldowns so the next breach
            // alerts immediately.
            self.cooldowns.clear_device(device_id);
            return;
        }

        let message = compose_message(device_id, breaches);

        // One independent send attempt per recipient address on each
        // configured channel. Attempts are spawned so a slow or failing
        // transport cannot delay or cancel its siblings.
        let mut attempts = Vec::new();
        for recipient in &self.recipients {
            for channel in &self.channels {
                let Some(address) = recipient.address_for(channel.kind()) else {
                    continue;
                };
                if !self
                    .cooldowns
                    .may_send(device_id, address, now, self.cooldown_window)
                {
                    tracing::debug!(
                        "Alert for {device_id} to {} via {} suppressed (cooldown)",
                        recipient.label(),
                        channel.name()
                    );
                    continue;
                }
                attempts.push((
                    Arc::clone(channel),
                    address.to_string(),
                    recipient.label().to_string(),
                ));
            }
        }

        let handles: Vec<_> = attempts
            .into_iter()
            .map(|(channel, address, label)| {
                let message = message.clone();
                let device = device_id.to_string();
                tokio::spawn(async move {
                    match channel.send(&address, &message).await {
                        Ok(()) => {
                            tracing::info!(
                                "Alert for {device} sent to {label} via {}",
                                channel.name()
                            );
                            Some(address)
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Alert for {device} to {label} via {} failed: {e}",
                                channel.name()
                            );
                            None
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            match handle.await {
                // Cooldown is only refreshed for attempts that succeeded.
                Ok(Some(address)) => self.cooldowns.record(device_id, &address, now),
                Ok(None) => {}
                Err(e) => tracing::warn!("Alert send task failed to complete: {e}"),
            }
        }
    }

    /// Test/introspection access to the cooldown state.
    #[must_use]
    pub fn cooldowns(&self) -> &CooldownStore {
        &self.cooldowns
    }
}

/// One aggregated human-readable message covering every breach of a reading.
fn compose_message(device_id: &str, breaches: &[BreachDescriptor]) -> String {
    let mut message = format!("Device {device_id} threshold alert:");
    for breach in breaches {
        let _ = write!(message, "\n- {breach}");
    }
    message
}
