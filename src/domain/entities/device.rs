use serde::{Deserialize, Serialize};

use crate::domain::value_objects::DeviceStatus;

/// Per-device alerting bounds and current status as stored in the registry.
///
/// Each bound is independently optional: `None` means that side is
/// unbounded and never produces a breach. The registry owns these rows;
/// the ingestion core only reads the bounds and writes `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceThresholds {
    pub device_id: String,
    pub hum_min: Option<f64>,
    pub hum_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub status: DeviceStatus,
}

impl DeviceThresholds {
    /// A device with no bounds configured; useful as a test base.
    #[must_use]
    pub fn unbounded(device_id: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            hum_min: None,
            hum_max: None,
            temp_min: None,
            temp_max: None,
            status: DeviceStatus::Offline,
        }
    }
}
