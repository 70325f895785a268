use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single sensor reading as decoded from the wire.
///
/// `event_timestamp` is the source-supplied measurement time and is
/// authoritative for identity; `received_at` is the local wall clock at
/// decode time and only feeds liveness tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub device_id: String,
    pub humidity: f64,
    pub temperature: f64,
    pub event_timestamp: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
}

impl Reading {
    /// Deterministic identity used as the idempotency key in storage.
    ///
    /// Two deliveries of the same measurement produce the same key, so the
    /// store's conditional insert collapses them into one row. The wire
    /// format carries second resolution, which this rendering preserves.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!(
            "{}_{}",
            self.device_id,
            self.event_timestamp.format("%Y%m%dT%H%M%S")
        )
    }
}
