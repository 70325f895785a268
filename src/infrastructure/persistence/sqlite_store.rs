use std::path::PathBuf;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::entities::device::DeviceThresholds;
use crate::domain::entities::reading::Reading;
use crate::domain::ports::device_registry::{DeviceRegistry, RegistryError};
use crate::domain::ports::reading_store::{InsertOutcome, ReadingStore, StoreError};
use crate::domain::value_objects::DeviceStatus;

use super::migrations;

/// SQLite-backed persistent store for readings and device rows.
///
/// Implements both the reading store and the device registry against one
/// database file; the registry's CRUD surface (device creation, bounds
/// edits) lives outside this service, so only lookup, status writes, and
/// a seeding helper are exposed here.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new `SQLite` store at the given path.
    ///
    /// Expands `~`, creates parent directories, opens connection,
    /// sets WAL mode and pragmas, and initializes schema.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the database cannot be opened or initialized.
    pub fn new(path: &str) -> Result<Self, StoreError> {
        let expanded = shellexpand::tilde(path);
        let db_path = PathBuf::from(expanded.as_ref());

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        }

        let conn =
            Connection::open(&db_path).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "busy_timeout", 5000)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        migrations::initialize_schema(&conn).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert or replace a device row. Seeding/test helper; bounds and
    /// coordinates are otherwise managed by the registry's own tooling.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::WriteFailed` if the write fails.
    pub fn upsert_device(&self, thresholds: &DeviceThresholds) -> Result<(), RegistryError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| RegistryError::WriteFailed("lock poisoned".into()))?;

        conn.execute(
            "INSERT INTO devices (id, status, hum_min, hum_max, temp_min, temp_max) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(id) DO UPDATE SET \
                status=excluded.status, \
                hum_min=excluded.hum_min, \
                hum_max=excluded.hum_max, \
                temp_min=excluded.temp_min, \
                temp_max=excluded.temp_max, \
                updated_at=CURRENT_TIMESTAMP",
            params![
                thresholds.device_id,
                thresholds.status.to_string(),
                thresholds.hum_min,
                thresholds.hum_max,
                thresholds.temp_min,
                thresholds.temp_max,
            ],
        )
        .map_err(|e| RegistryError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    /// Number of stored readings for a device.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadFailed` if the query fails.
    pub fn reading_count(&self, device_id: &str) -> Result<u64, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM readings WHERE device_id = ?1",
                params![device_id],
                |row| row.get(0),
            )
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        u64::try_from(count).map_err(|e| StoreError::ReadFailed(e.to_string()))
    }
}

fn parse_device_row(row: &rusqlite::Row<'_>) -> Result<DeviceThresholds, rusqlite::Error> {
    let device_id: String = row.get(0)?;
    let hum_min: Option<f64> = row.get(1)?;
    let hum_max: Option<f64> = row.get(2)?;
    let temp_min: Option<f64> = row.get(3)?;
    let temp_max: Option<f64> = row.get(4)?;
    let status_str: String = row.get(5)?;

    let status: DeviceStatus = status_str.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })?;

    Ok(DeviceThresholds {
        device_id,
        hum_min,
        hum_max,
        temp_min,
        temp_max,
        status,
    })
}

impl ReadingStore for SqliteStore {
    fn insert_if_absent(&self, reading: &Reading) -> Result<InsertOutcome, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;

        // INSERT OR IGNORE on the deterministic identity absorbs
        // at-least-once redelivery as a silent no-op.
        let changed = conn
            .execute(
                "INSERT OR IGNORE INTO readings \
                 (id, device_id, humidity, temperature, recorded_at, received_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    reading.storage_key(),
                    reading.device_id,
                    reading.humidity,
                    reading.temperature,
                    reading.event_timestamp.to_rfc3339(),
                    reading.received_at.to_rfc3339(),
                ],
            )
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        if changed == 0 {
            Ok(InsertOutcome::AlreadyPresent)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }
}

impl DeviceRegistry for SqliteStore {
    fn get_thresholds(&self, device_id: &str) -> Result<Option<DeviceThresholds>, RegistryError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| RegistryError::ReadFailed("lock poisoned".into()))?;

        conn.query_row(
            "SELECT id, hum_min, hum_max, temp_min, temp_max, status \
             FROM devices WHERE id = ?1",
            params![device_id],
            parse_device_row,
        )
        .optional()
        .map_err(|e| RegistryError::ReadFailed(e.to_string()))
    }

    fn set_status(&self, device_id: &str, status: DeviceStatus) -> Result<(), RegistryError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| RegistryError::WriteFailed("lock poisoned".into()))?;

        let changed = conn
            .execute(
                "UPDATE devices SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                params![status.to_string(), device_id],
            )
            .map_err(|e| RegistryError::WriteFailed(e.to_string()))?;

        if changed == 0 {
            return Err(RegistryError::DeviceNotFound(device_id.to_string()));
        }
        Ok(())
    }
}
