//! Key-value storage access layer.
//!
//! A [`KvStore`] is a flat string-keyed map of byte values. Batches are atomic
//! per key only; nothing here enforces record invariants, callers do that under
//! named locks.

use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Uniform batch interface over the physical store.
pub trait KvStore: Send + Sync {
    /// Fetches the given keys. Absent keys are missing from the returned map.
    fn get_many(&self, keys: &[String]) -> Result<HashMap<String, Vec<u8>>>;

    /// Writes every entry, overwriting existing values.
    fn set_many(&self, entries: Vec<(String, Vec<u8>)>) -> Result<()>;

    /// Removes the given keys. Absent keys are ignored.
    fn delete_many(&self, keys: &[String]) -> Result<()>;

    /// Lists every stored key. Used for inspection, never on hot paths.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Volatile store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get_many(&self, keys: &[String]) -> Result<HashMap<String, Vec<u8>>> {
        let entries = self.entries.read();
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    fn set_many(&self, entries: Vec<(String, Vec<u8>)>) -> Result<()> {
        let mut map = self.entries.write();
        for (key, value) in entries {
            map.insert(key, value);
        }
        Ok(())
    }

    fn delete_many(&self, keys: &[String]) -> Result<()> {
        let mut map = self.entries.write();
        for key in keys {
            map.remove(key);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
