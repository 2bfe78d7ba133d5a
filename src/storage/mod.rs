//! Storage
//!
//! A string-keyed, string-valued persistence capability. The cart store owns
//! one of these and writes its whole state under a single key.

use std::io;

use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::InMemoryStorage;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error from a file-backed store
    #[error("storage IO failed: {0}")]
    Io(#[from] io::Error),

    /// The key cannot be used by this backend
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The backend refused the write
    #[error("storage rejected write to {key:?}: {reason}")]
    Rejected {
        /// Key being written
        key: String,

        /// Why the backend refused
        reason: String,
    },
}

/// Key-value persistence used by the cart store.
pub trait KeyValueStorage {
    /// Reads the value under `key`, `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend refuses or fails the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes the value under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend fails the delete.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
