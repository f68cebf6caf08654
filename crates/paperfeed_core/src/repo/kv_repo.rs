//! Key-value persistence contract and implementations.
//!
//! # Responsibility
//! - Provide `get`/`set` over string keys and string values.
//! - Keep SQL details inside the core persistence boundary.
//! - Provide JSON encode/decode helpers shared by the stores.
//!
//! # Invariants
//! - `set` is a single statement: readers observe the old or the new value,
//!   never a partial one.
//! - Undecodable persisted values are reported as `StorageError::Corrupt`
//!   instead of being masked here; fail-soft policy belongs to services.

use crate::db::{migrations, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the JSON array of interest tags.
pub const USER_INTERESTS_KEY: &str = "user_interests";
/// Storage key holding the JSON array of bookmarked papers.
pub const BOOKMARKED_PAPERS_KEY: &str = "bookmarked_papers";
/// Storage key holding the launch flag text (`"true"`).
pub const HAS_LAUNCHED_KEY: &str = "hasLaunched";

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure surfaced by key-value stores.
#[derive(Debug)]
pub enum StorageError {
    /// Backend read/write failure.
    Db(DbError),
    /// Persisted value exists but cannot be decoded.
    Corrupt { key: String, message: String },
    /// Value could not be encoded before writing.
    Encode(String),
    /// Backend is reachable but not usable (e.g. schema missing).
    Unavailable(String),
}

impl StorageError {
    /// Whether the backend gave up waiting on a lock.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_busy())
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "storage unavailable: {err}"),
            Self::Corrupt { key, message } => {
                write!(f, "corrupt value under `{key}`: {message}")
            }
            Self::Encode(message) => write!(f, "failed to encode value: {message}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Corrupt { .. } | Self::Encode(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Async-storage-shaped persistence contract.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key was never set.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// Returns `StorageError::Unavailable` when the schema is not at the
    /// latest version, i.e. the connection did not come from `open_db*`.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        if !migrations::schema_is_current(conn)? {
            return Err(StorageError::Unavailable(format!(
                "{} schema not migrated; open the database with open_db",
                migrations::KV_TABLE
            )));
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
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

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local key-value store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and decodes a JSON value; `None` when the key was never set.
pub fn read_json<T, S>(store: &S, key: &str) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StorageError::Corrupt {
            key: key.to_string(),
            message: err.to_string(),
        })
}

/// Encodes `value` as JSON and writes it under `key` in one `set` call.
pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded =
        serde_json::to_string(value).map_err(|err| StorageError::Encode(err.to_string()))?;
    store.set(key, &encoded)
}

#[cfg(test)]
mod tests {
    use super::{read_json, write_json, KeyValueStore, MemoryKeyValueStore, StorageError};

    #[test]
    fn memory_store_replaces_values() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn only_lock_waits_count_as_timeouts() {
        let busy = StorageError::from(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            None,
        ));
        assert!(busy.is_timeout());
        assert!(!StorageError::Unavailable("offline".to_string()).is_timeout());
    }

    #[test]
    fn read_json_reports_corrupt_values() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "{not json").unwrap();
        let err = read_json::<Vec<String>, _>(&store, "k").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == "k"));
    }

    #[test]
    fn json_helpers_roundtrip_through_borrowed_store() {
        let store = MemoryKeyValueStore::new();
        let borrowed = &store;
        write_json(&borrowed, "k", &vec!["a".to_string()]).unwrap();
        let loaded: Option<Vec<String>> = read_json(&store, "k").unwrap();
        assert_eq!(loaded, Some(vec!["a".to_string()]));
    }
}
