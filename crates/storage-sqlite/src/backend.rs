//! The SQLite key-value backend.

use std::path::Path;
use std::sync::Mutex;

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use walletkeeper_core::errors::{DatabaseError, Result};
use walletkeeper_core::store::KvBackend;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS collections (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

const UPSERT: &str = "
INSERT INTO collections (key, value, updated_at)
VALUES (?1, ?2, datetime('now'))
ON CONFLICT(key) DO UPDATE SET
    value = excluded.value,
    updated_at = excluded.updated_at
";

/// Durable key-value medium over one SQLite database file.
///
/// The connection is serialized behind a mutex; the store has a single
/// logical writer, so there is nothing to gain from a pool here.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Opens (or creates) the database at `path` and ensures the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| DatabaseError::OpenFailed(e.to_string()))?;
        Self::prepare(conn)
    }

    /// An in-memory database, dropped on close. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DatabaseError::OpenFailed(e.to_string()))?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
            .map_err(|e| DatabaseError::OpenFailed(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| DatabaseError::OpenFailed(e.to_string()))?;
        debug!("sqlite store ready");
        Ok(SqliteBackend {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DatabaseError::Internal(e.to_string()).into())
    }
}

impl KvBackend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM collections WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| DatabaseError::ReadFailed(e.to_string()).into())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(UPSERT, params![key, value])
            .map_err(|e| DatabaseError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    fn set_many(&self, entries: &[(String, String)]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        for (key, value) in entries {
            tx.execute(UPSERT, params![key, value])
                .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        }
        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT 1 FROM collections WHERE key = ?1",
            params![key],
            |_| Ok(()),
        )
        .optional()
        .map(|found| found.is_some())
        .map_err(|e| DatabaseError::ReadFailed(e.to_string()).into())
    }
}
