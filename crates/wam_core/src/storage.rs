//! Typed record access over a [`KvStore`].

use crate::error::{Result, WamError};
use crate::keys::StoreKey;
use crate::store::KvStore;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Serializes records as JSON under partitioned [`StoreKey`]s.
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn KvStore>,
}

impl Storage {
    /// Wraps a store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Loads a single record.
    pub fn get<T: DeserializeOwned>(&self, key: &StoreKey) -> Result<Option<T>> {
        let raw = key.encode();
        let mut found = self.store.get_many(std::slice::from_ref(&raw))?;
        found
            .remove(&raw)
            .map(|bytes| decode(&raw, &bytes))
            .transpose()
    }

    /// Loads several records of one type. Absent keys are missing from the map.
    pub fn get_many<T: DeserializeOwned>(&self, keys: &[StoreKey]) -> Result<HashMap<StoreKey, T>> {
        let raw: Vec<String> = keys.iter().map(StoreKey::encode).collect();
        let mut found = self.store.get_many(&raw)?;

        let mut records = HashMap::with_capacity(found.len());
        for (key, raw_key) in keys.iter().zip(&raw) {
            if let Some(bytes) = found.remove(raw_key) {
                records.insert(key.clone(), decode(raw_key, &bytes)?);
            }
        }
        Ok(records)
    }

    /// Writes a single record.
    pub fn put<T: Serialize>(&self, key: &StoreKey, value: &T) -> Result<()> {
        self.store.set_many(vec![(key.encode(), encode(value)?)])
    }

    /// Removes records. Absent keys are ignored.
    pub fn delete_many(&self, keys: &[StoreKey]) -> Result<()> {
        let raw: Vec<String> = keys.iter().map(StoreKey::encode).collect();
        self.store.delete_many(&raw)
    }

    /// Every key this crate understands, sorted by display form.
    pub fn keys(&self) -> Result<Vec<StoreKey>> {
        let mut keys: Vec<StoreKey> = self
            .store
            .keys()?
            .iter()
            .filter_map(|raw| StoreKey::decode(raw))
            .collect();
        keys.sort_by_key(|k| k.to_string());
        Ok(keys)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| WamError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(raw_key: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| WamError::Deserialization {
        key: raw_key.replace('\0', ":"),
        reason: e.to_string(),
    })
}
