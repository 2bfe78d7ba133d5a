//! Store outcomes
//!
//! Persistence failures never abort a cart operation. They are recorded next
//! to the value the operation produced so callers can inspect them.

use smallvec::SmallVec;
use thiserror::Error;

use crate::storage::StorageError;

/// Why a persisted cart could not be read.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The storage backend failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The stored value is not a valid cart
    #[error("stored cart could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a cart could not be persisted.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The storage backend failed or refused the write
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The cart could not be serialized
    #[error("cart could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A failed read or write of the persisted cart.
#[derive(Debug, Error)]
pub enum PersistenceFailure {
    /// Reading failed; an empty cart was used in its place.
    #[error("failed to read cart from {key:?}: {source}")]
    Read {
        /// Storage key
        key: String,

        /// Underlying error
        source: ReadError,
    },

    /// Writing failed; the returned cart was not saved.
    #[error("failed to write cart to {key:?}: {source}")]
    Write {
        /// Storage key
        key: String,

        /// Underlying error
        source: WriteError,
    },
}

impl PersistenceFailure {
    /// Check if this is a read failure.
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read { .. })
    }

    /// Check if this is a write failure.
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

/// Failures collected during one store operation. A read-modify-write cycle
/// produces at most one of each kind.
pub type Failures = SmallVec<[PersistenceFailure; 2]>;

/// The value of a store operation plus any persistence failures it absorbed.
#[derive(Debug)]
#[must_use]
pub struct Outcome<T> {
    value: T,
    failures: Failures,
}

impl<T> Outcome<T> {
    pub(crate) fn new(value: T, failures: Failures) -> Self {
        Self { value, failures }
    }

    pub(crate) fn clean(value: T) -> Self {
        Self::new(value, Failures::new())
    }

    /// The produced value, which may be a fallback.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the outcome, discarding any failures.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Consume the outcome into its value and failures.
    pub fn into_parts(self) -> (T, Failures) {
        (self.value, self.failures)
    }

    /// Failures absorbed while producing the value.
    pub fn failures(&self) -> &[PersistenceFailure] {
        &self.failures
    }

    /// Check if any failure was absorbed.
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    /// The read failure, if the persisted cart could not be read.
    pub fn read_failure(&self) -> Option<&PersistenceFailure> {
        self.failures.iter().find(|failure| failure.is_read())
    }

    /// The write failure, if the result was not saved.
    pub fn write_failure(&self) -> Option<&PersistenceFailure> {
        self.failures.iter().find(|failure| failure.is_write())
    }

    /// Convert into a `Result`, failing with the first absorbed failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`PersistenceFailure`] if the outcome is degraded.
    pub fn into_result(self) -> Result<T, PersistenceFailure> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure),
            None => Ok(self.value),
        }
    }

    /// Map the value, keeping the failures.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome::new(f(self.value), self.failures)
    }
}
