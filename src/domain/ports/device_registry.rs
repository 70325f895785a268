use thiserror::Error;

use crate::domain::entities::device::DeviceThresholds;
use crate::domain::value_objects::DeviceStatus;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("registry read failed: {0}")]
    ReadFailed(String),
    #[error("registry write failed: {0}")]
    WriteFailed(String),
    #[error("device not registered: {0}")]
    DeviceNotFound(String),
}

/// Source of per-device threshold bounds and target of status updates.
///
/// Device rows are owned and mutated elsewhere (registry CRUD is outside
/// this service); the ingestion core only reads bounds and writes status.
pub trait DeviceRegistry: Send + Sync {
    /// Fetch bounds and current status for a device.
    ///
    /// Returns `Ok(None)` when the device is not registered.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if the read operation fails.
    fn get_thresholds(&self, device_id: &str) -> Result<Option<DeviceThresholds>, RegistryError>;

    /// Persist a new status for a device.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DeviceNotFound` if the device row has
    /// vanished, or `RegistryError::WriteFailed` on storage failure.
    fn set_status(&self, device_id: &str, status: DeviceStatus) -> Result<(), RegistryError>;
}
