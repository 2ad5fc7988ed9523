// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Ebb Contributors

//! Durable key-value store adapter.
//!
//! Everything ebb persists goes through the [`Store`] trait: a synchronous,
//! string-keyed, capacity-bounded durable map. The cache and the pending
//! action queue are both views over one shared store.
//!
//! Two backends are provided:
//! - [`SqliteStore`]: the production backend, a single `kv` table.
//! - [`MemoryStore`]: a HashMap behind the same contract, for tests and
//!   ephemeral use.
//!
//! Writes can fail with [`Error::CapacityExceeded`] when a quota is
//! configured; callers treat that as a recoverable signal, not a fault.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};

/// SQL schema for the key-value store.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Synchronous durable key-value store.
///
/// `read` never fails on malformed stored payloads; deciding whether a
/// value parses is the caller's job, and the caller deletes corrupt
/// records itself.
pub trait Store: Send + Sync {
    /// Writes a value, replacing any existing value for the key.
    ///
    /// Returns [`Error::CapacityExceeded`] when the store is quota-bounded
    /// and the write would not fit.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Reads the value for a key, or `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Removes a key. No-op if absent.
    fn remove(&self, key: &str) -> Result<()>;

    /// Returns all keys starting with the given prefix, sorted.
    fn keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Approximate bytes of keys plus values currently stored.
    fn used_bytes(&self) -> Result<u64>;
}

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    capacity: Option<u64>,
}

impl SqliteStore {
    /// Opens or creates a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(SqliteStore { conn: Mutex::new(conn), capacity: None })
    }

    /// Opens a store at the default per-user state location
    /// (`~/.local/state/ebb/store.db` on Linux).
    pub fn open_default() -> Result<Self> {
        let base = dirs::state_dir().or_else(dirs::data_local_dir).ok_or(Error::NoStateDir)?;
        Self::open(base.join("ebb").join("store.db"))
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn: Mutex::new(conn), capacity: None })
    }

    /// Bounds the store to roughly `bytes` of key + value data.
    pub fn with_capacity(mut self, bytes: u64) -> Self {
        self.capacity = Some(bytes);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Store for SqliteStore {
    fn write(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock();

        if let Some(capacity) = self.capacity {
            // Size of everything else plus the incoming record.
            let others: u64 = conn.query_row(
                "SELECT COALESCE(SUM(LENGTH(key) + LENGTH(value)), 0) FROM kv WHERE key != ?1",
                params![key],
                |row| row.get::<_, i64>(0),
            )? as u64;
            let incoming = (key.len() + value.len()) as u64;
            if others + incoming > capacity {
                return Err(Error::CapacityExceeded);
            }
        }

        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock();
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock();
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut keys = Vec::new();
        for row in rows {
            let key = row?;
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn used_bytes(&self) -> Result<u64> {
        let conn = self.lock();
        let bytes: u64 = conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(key) + LENGTH(value)), 0) FROM kv",
            [],
            |row| row.get::<_, i64>(0),
        )? as u64;
        Ok(bytes)
    }
}

/// In-memory store (for testing and ephemeral sessions).
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    capacity: Option<u64>,
}

impl MemoryStore {
    /// Creates an unbounded in-memory store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Bounds the store to roughly `bytes` of key + value data.
    pub fn with_capacity(mut self, bytes: u64) -> Self {
        self.capacity = Some(bytes);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Store for MemoryStore {
    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock();

        if let Some(capacity) = self.capacity {
            let others: u64 = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| (k.len() + v.len()) as u64)
                .sum();
            let incoming = (key.len() + value.len()) as u64;
            if others + incoming > capacity {
                return Err(Error::CapacityExceeded);
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> =
            self.lock().keys().filter(|k| k.starts_with(prefix)).cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn used_bytes(&self) -> Result<u64> {
        Ok(self.lock().iter().map(|(k, v)| (k.len() + v.len()) as u64).sum())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
