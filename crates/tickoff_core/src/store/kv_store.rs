//! Key-value store contracts and implementations.
//!
//! # Responsibility
//! - Provide the durable single-key storage consumed by snapshot load/save.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - `write` replaces the previous value for the key atomically.
//! - SQLite stores require a fully migrated connection.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from snapshot storage.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// State could not be encoded for storage.
    Serialize(serde_json::Error),
    /// Backend refused the operation (quota, read-only medium, ...).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "snapshot store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::Serialize(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Unavailable(message) => write!(f, "snapshot store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::UninitializedConnection { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Durable local key-value storage for serialized snapshots.
pub trait SnapshotStore {
    /// Returns the stored value, or `None` when the key was never written.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the stored value for `key`.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &T {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).write(key, value)
    }
}

/// SQLite-backed snapshot store over the `kv_entries` table.
pub struct SqliteSnapshotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotStore<'conn> {
    /// Creates a store from a connection returned by `open_db*`.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl SnapshotStore for SqliteSnapshotStore<'_> {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local store for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one raw value.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.into(), value.into());
        store
    }

    /// Number of successful `write` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
