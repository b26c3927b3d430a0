/// In-memory record store
///
/// Useful for ephemeral sessions and tests. Wrap it in an `Arc` to share one
/// store between several tracker instances.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::storage::{KeyValueStore, StorageError, StorageKey};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StorageKey, String>> {
        // a poisoned map is still a valid map
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(&key).cloned())
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key, value.to_string());
        Ok(())
    }
}
