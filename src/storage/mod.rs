/// Storage layer for persisting tracker state
///
/// State is persisted as four independent named records, each a
/// self-contained serialized value. There is no transaction spanning
/// records: every change overwrites exactly one of them.

pub mod memory;
pub mod migrations;
pub mod persistence;
pub mod sqlite;

// Re-export the main storage types
pub use memory::MemoryStore;
pub use persistence::{Persistence, Record, RecordValue, Snapshot};
pub use sqlite::{SqliteChangeFeed, SqliteStore};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed record '{key}': {reason}")]
    Malformed { key: StorageKey, reason: String },

    #[error("Unknown record key: {0}")]
    UnknownKey(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Names of the four persisted records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Habits,
    DayLogs,
    WeightLogs,
    DailyGoal,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::Habits,
        StorageKey::DayLogs,
        StorageKey::WeightLogs,
        StorageKey::DailyGoal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Habits => "muscleup.habits",
            StorageKey::DayLogs => "muscleup.day_logs",
            StorageKey::WeightLogs => "muscleup.weight_logs",
            StorageKey::DailyGoal => "muscleup.daily_goal",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKey {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| StorageError::UnknownKey(s.to_string()))
    }
}

/// Durable string-valued record store
///
/// This trait allows the tracker to run against SQLite on disk or a plain
/// in-memory map while keeping the same load/save contract.
pub trait KeyValueStore {
    /// Read the raw value of a record; `None` if it was never written
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Overwrite a record with a new raw value
    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}
