use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// In-process record of when each device was last heard from.
///
/// Entries are created and advanced only by reading arrivals and consulted
/// only by the periodic sweep. The map is keyed by wall-clock arrival time,
/// not the reading's own timestamp, so late-delivered historical data does
/// not make a live device look stale. State is lost on restart: a device
/// that went quiet before the process started is never swept until it
/// publishes again (documented limitation).
pub struct LivenessTracker {
    last_seen: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl LivenessTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Record an arrival for a device, advancing its entry monotonically.
    ///
    /// Concurrent handlers may race on the same device; taking the max
    /// keeps the entry from moving backwards.
    pub fn touch(&self, device_id: &str, at: DateTime<Utc>) {
        let mut map = self.last_seen.lock();
        map.entry(device_id.to_string())
            .and_modify(|seen| {
                if at > *seen {
                    *seen = at;
                }
            })
            .or_insert(at);
    }

    /// Devices whose last arrival is older than `offline_after` at `now`.
    ///
    /// Devices with no entry (never seen since process start) are not
    /// reported.
    #[must_use]
    pub fn stale_devices(&self, now: DateTime<Utc>, offline_after: Duration) -> Vec<String> {
        self.last_seen
            .lock()
            .iter()
            .filter(|(_, seen)| now - **seen > offline_after)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Last recorded arrival for a device, if any.
    #[must_use]
    pub fn last_seen(&self, device_id: &str) -> Option<DateTime<Utc>> {
        self.last_seen.lock().get(device_id).copied()
    }
}

impl Default for LivenessTracker {
    fn default() -> Self {
        Self::new()
    }
}
