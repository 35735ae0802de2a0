//! Key-value persistence boundary.
//!
//! # Responsibility
//! - Define the string key-value contract every service persists through.
//! - Provide an in-process store and a SQLite-backed durable store.
//!
//! # Invariants
//! - Values are whole JSON documents; writes overwrite, never patch.
//! - Store methods take `&self` so one store can back several services.
//! - A single logical caller is assumed. Concurrent read-modify-write cycles
//!   against the same key are last-writer-wins.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Recognized storage keys.
pub struct StorageKey;

impl StorageKey {
    /// JSON array of credential records.
    pub const USERS: &'static str = "users";
    /// JSON array of all behaviors across all users.
    pub const BEHAVIORS: &'static str = "behaviors";
    /// JSON object of the current session user, absent when signed out.
    pub const SESSION_USER: &'static str = "user";
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure talking to the backing store.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode(serde_json::Error),
    /// Stored value is valid JSON but does not fit the expected record shape.
    /// Writers must not overwrite it.
    IncompatibleDocument {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "store backend error: {err}"),
            Self::Encode(err) => write!(f, "failed to encode stored document: {err}"),
            Self::IncompatibleDocument { key, source } => {
                write!(f, "stored `{key}` document has an unexpected shape: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::IncompatibleDocument { source, .. } => Some(source),
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

/// Synchronous string key-value store.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`; missing keys are not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}
