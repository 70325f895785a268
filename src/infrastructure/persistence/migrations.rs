use rusqlite::Connection;

/// Initialize the database schema, creating tables if they don't exist.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS devices (
            id          TEXT PRIMARY KEY,
            longitude   REAL,
            latitude    REAL,
            status      TEXT    NOT NULL DEFAULT 'offline',
            hum_min     REAL,
            hum_max     REAL,
            temp_min    REAL,
            temp_max    REAL,
            created_at  TEXT    NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at  TEXT    NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS readings (
            id          TEXT PRIMARY KEY,
            device_id   TEXT    NOT NULL,
            humidity    REAL    NOT NULL,
            temperature REAL    NOT NULL,
            recorded_at TEXT    NOT NULL,
            received_at TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_readings_device_recorded
            ON readings(device_id, recorded_at);
        CREATE INDEX IF NOT EXISTS idx_devices_status ON devices(status);",
    )?;
    Ok(())
}
