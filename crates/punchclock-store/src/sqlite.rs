//! SQLite-based store implementation
//!
//! Data is kept in a single key-value table. The whole record sequence lives
//! under [`RECORDS_STORAGE_KEY`] as one JSON array.

use punchclock_api::{AttendanceRecord, RECORDS_STORAGE_KEY};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::{Store, StoreError, StoreResult};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".into()))
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }

    /// Read the raw value stored under `key`
    pub fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.conn()?;

        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional()?;

        Ok(value)
    }

    /// Replace the raw value stored under `key`
    pub fn put_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        let updated_at = punchclock_util::now().to_rfc3339();

        conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key)
            DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, updated_at],
        )?;

        Ok(())
    }
}

impl Store for SqliteStore {
    fn load_records(&self) -> StoreResult<Option<Vec<AttendanceRecord>>> {
        let Some(json) = self.get_raw(RECORDS_STORAGE_KEY)? else {
            return Ok(None);
        };

        let records: Vec<AttendanceRecord> = serde_json::from_str(&json)?;
        debug!(count = records.len(), "Attendance records loaded");
        Ok(Some(records))
    }

    fn save_records(&self, records: &[AttendanceRecord]) -> StoreResult<()> {
        let json = serde_json::to_string(records)?;
        self.put_raw(RECORDS_STORAGE_KEY, &json)?;

        debug!(count = records.len(), bytes = json.len(), "Attendance records saved");
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        match self.conn() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => false,
        }
    }
}
