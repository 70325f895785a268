use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::domain::entities::device::DeviceThresholds;
use crate::domain::entities::reading::Reading;
use crate::domain::ports::device_registry::{DeviceRegistry, RegistryError};
use crate::domain::ports::reading_store::{InsertOutcome, ReadingStore, StoreError};
use crate::domain::value_objects::DeviceStatus;

/// In-memory store for testing purposes: implements both the reading store
/// and the device registry, and counts status writes so transition tests
/// can assert "exactly once".
pub struct InMemoryStore {
    readings: Mutex<HashMap<String, Reading>>,
    devices: Mutex<HashMap<String, DeviceThresholds>>,
    status_writes: AtomicUsize,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            readings: Mutex::new(HashMap::new()),
            devices: Mutex::new(HashMap::new()),
            status_writes: AtomicUsize::new(0),
        }
    }

    /// Seed or replace a device row.
    pub fn upsert_device(&self, thresholds: DeviceThresholds) {
        self.devices
            .lock()
            .insert(thresholds.device_id.clone(), thresholds);
    }

    /// Number of stored readings.
    #[must_use]
    pub fn reading_count(&self) -> usize {
        self.readings.lock().len()
    }

    /// Stored reading by identity key, if present.
    #[must_use]
    pub fn reading(&self, key: &str) -> Option<Reading> {
        self.readings.lock().get(key).cloned()
    }

    /// Current status of a device, if registered.
    #[must_use]
    pub fn status_of(&self, device_id: &str) -> Option<DeviceStatus> {
        self.devices.lock().get(device_id).map(|d| d.status)
    }

    /// Total `set_status` calls that reached the registry.
    #[must_use]
    pub fn status_writes(&self) -> usize {
        self.status_writes.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingStore for InMemoryStore {
    fn insert_if_absent(&self, reading: &Reading) -> Result<InsertOutcome, StoreError> {
        let mut readings = self.readings.lock();
        let key = reading.storage_key();
        if readings.contains_key(&key) {
            return Ok(InsertOutcome::AlreadyPresent);
        }
        readings.insert(key, reading.clone());
        Ok(InsertOutcome::Inserted)
    }
}

impl DeviceRegistry for InMemoryStore {
    fn get_thresholds(&self, device_id: &str) -> Result<Option<DeviceThresholds>, RegistryError> {
        Ok(self.devices.lock().get(device_id).cloned())
    }

    fn set_status(&self, device_id: &str, status: DeviceStatus) -> Result<(), RegistryError> {
        let mut devices = self.devices.lock();
        let Some(device) = devices.get_mut(device_id) else {
            return Err(RegistryError::DeviceNotFound(device_id.to_string()));
        };
        device.status = status;
        self.status_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
