//! SQLite-backed key-value storage.
//!
//! One `kv_store` table, one row per key. Each write is a single upsert.

use super::{check_quota, Storage};
use crate::error::StorageResult;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub struct SqliteStorage {
    conn: Connection,
    quota: Option<usize>,
}

impl SqliteStorage {
    /// Opens (or creates) the database file and initialises the schema.
    pub fn open(path: &Path, quota: Option<usize>) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        log::info!("Wishlist DB: {}", path.display());
        let conn = Connection::open(path)?;
        Self::from_connection(conn, quota)
    }

    /// In-memory database, mostly for tests
    pub fn open_in_memory(quota: Option<usize>) -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, quota)
    }

    fn from_connection(conn: Connection, quota: Option<usize>) -> StorageResult<Self> {
        init_schema(&conn)?;
        Ok(Self { conn, quota })
    }

    fn used_by_others(&self, key: &str) -> StorageResult<usize> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
             FROM kv_store WHERE key != ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(used.max(0) as usize)
    }
}

/// Creates the `kv_store` table if it does not already exist.
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key        TEXT NOT NULL PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.quota.is_some() {
            check_quota(self.quota, self.used_by_others(key)?, key, value)?;
        }
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET
                value      = excluded.value,
                updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}
