//! In-memory storage

use rustc_hash::FxHashMap;

use super::{KeyValueStorage, StorageError};

/// Hash map backed storage.
///
/// An optional quota caps the total size of stored keys and values in bytes;
/// writes that would exceed it are rejected, the way browser storage refuses
/// writes once its quota is used up.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    entries: FxHashMap<String, String>,
    quota: Option<usize>,
}

impl InMemoryStorage {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes past `bytes` in total.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            quota: Some(bytes),
        }
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |previous| key.len() + previous.len());

            let required = self.used_bytes() - replaced + key.len() + value.len();

            if required > quota {
                return Err(StorageError::Rejected {
                    key: key.to_string(),
                    reason: format!("quota of {quota} bytes exceeded ({required} required)"),
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);

        Ok(())
    }
}
