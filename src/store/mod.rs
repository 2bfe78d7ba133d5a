//! Cart store
//!
//! The store is the only owner of the persisted cart. Every mutation reads the
//! full cart, changes it in memory and writes the full cart back under a single
//! storage key. Read and write failures never reach the caller as errors: a
//! failed read falls back to an empty cart, a failed write still returns the
//! in-memory result, and both are reported on the returned [`Outcome`].

use std::num::NonZeroU32;

use tracing::{debug, error, warn};

use crate::{
    cart::Cart,
    products::{Product, ProductId},
    storage::KeyValueStorage,
    totals::{Totals, compute_totals},
};

pub mod outcome;

pub use outcome::{Failures, Outcome, PersistenceFailure, ReadError, WriteError};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "ecommerceCart";

/// Persisted cart over an injected key-value storage.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Create a store persisting under [`DEFAULT_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Create a store persisting under `key`.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The underlying storage, mutably.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Consume the store, returning its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Reads the persisted cart, treating a missing value as an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceFailure::Read`] if the storage fails or the stored
    /// value does not parse.
    pub fn try_load(&self) -> Result<Cart, PersistenceFailure> {
        let stored = self.storage.get(&self.key).map_err(|err| self.read_failure(err))?;

        match stored {
            Some(json) => serde_json::from_str(&json).map_err(|err| self.read_failure(err)),
            None => Ok(Cart::new()),
        }
    }

    /// Reads the persisted cart.
    ///
    /// Missing or unreadable state yields an empty cart; a read failure is
    /// logged and carried on the outcome.
    pub fn load(&self) -> Outcome<Cart> {
        match self.try_load() {
            Ok(cart) => Outcome::clean(cart),
            Err(failure) => {
                warn!(key = %self.key, error = %failure, "falling back to an empty cart");

                Outcome::new(Cart::new(), smallvec::smallvec![failure])
            }
        }
    }

    /// Writes the full cart under the storage key.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceFailure::Write`] if serialization or the storage
    /// write fails.
    pub fn save(&mut self, cart: &Cart) -> Result<(), PersistenceFailure> {
        let json = serde_json::to_string(cart).map_err(|err| self.write_failure(err))?;

        self.storage
            .set(&self.key, &json)
            .map_err(|err| self.write_failure(err))?;

        debug!(key = %self.key, lines = cart.len(), "saved cart");

        Ok(())
    }

    /// Adds one unit of `product` and persists the cart.
    ///
    /// A product already in the cart has its quantity incremented; its captured
    /// price and discount are left as they were.
    #[tracing::instrument(name = "cart_store.add_item", skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&mut self, product: &Product) -> Outcome<Cart> {
        self.mutate(|cart| cart.add_product(product))
    }

    /// Removes the line for `id`, if any, and persists the cart.
    #[tracing::instrument(name = "cart_store.remove_item", skip(self, id), fields(product_id = %id))]
    pub fn remove_item(&mut self, id: &ProductId) -> Outcome<Cart> {
        self.mutate(|cart| {
            cart.remove(id);
        })
    }

    /// Sets the quantity of the line for `id`.
    ///
    /// A cart without that line is returned unchanged and not persisted. A
    /// quantity of zero or less removes the line. Quantities above `u32::MAX`
    /// are capped.
    #[tracing::instrument(name = "cart_store.set_quantity", skip(self, id), fields(product_id = %id))]
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> Outcome<Cart> {
        let (mut cart, failures) = self.load().into_parts();

        if !cart.contains(id) {
            debug!("no line for product; cart left untouched");

            return Outcome::new(cart, failures);
        }

        match positive_quantity(quantity) {
            Some(quantity) => {
                cart.set_quantity(id, quantity);
            }
            None => {
                cart.remove(id);
            }
        }

        self.persist(cart, failures)
    }

    /// Persists and returns an empty cart.
    #[tracing::instrument(name = "cart_store.clear", skip(self))]
    pub fn clear(&mut self) -> Outcome<Cart> {
        self.persist(Cart::new(), Failures::new())
    }

    /// Computes the totals of `cart`. Pure; nothing is read or written.
    pub fn compute_totals(cart: &Cart) -> Totals {
        compute_totals(cart)
    }

    fn mutate(&mut self, apply: impl FnOnce(&mut Cart)) -> Outcome<Cart> {
        let (mut cart, failures) = self.load().into_parts();

        apply(&mut cart);

        self.persist(cart, failures)
    }

    fn persist(&mut self, cart: Cart, mut failures: Failures) -> Outcome<Cart> {
        if let Err(failure) = self.save(&cart) {
            error!(key = %self.key, error = %failure, "cart changes were not saved");

            failures.push(failure);
        }

        Outcome::new(cart, failures)
    }

    fn read_failure(&self, err: impl Into<ReadError>) -> PersistenceFailure {
        PersistenceFailure::Read {
            key: self.key.clone(),
            source: err.into(),
        }
    }

    fn write_failure(&self, err: impl Into<WriteError>) -> PersistenceFailure {
        PersistenceFailure::Write {
            key: self.key.clone(),
            source: err.into(),
        }
    }
}

fn positive_quantity(quantity: i64) -> Option<NonZeroU32> {
    if quantity <= 0 {
        return None;
    }

    let capped = u32::try_from(quantity).unwrap_or(u32::MAX);

    NonZeroU32::new(capped)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::storage::{InMemoryStorage, StorageError};

    use super::*;

    /// Storage whose reads and writes can be made to fail.
    #[derive(Debug, Default)]
    struct FlakyStorage {
        inner: InMemoryStorage,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl KeyValueStorage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(StorageError::Rejected {
                    key: key.to_string(),
                    reason: "read disabled".to_string(),
                });
            }

            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Rejected {
                    key: key.to_string(),
                    reason: "write disabled".to_string(),
                });
            }

            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn shirt() -> Product {
        Product::new(1_u64, "Shirt", Decimal::from(10)).with_discount(Decimal::from(2))
    }

    #[test]
    fn positive_quantity_handles_bounds() {
        assert_eq!(positive_quantity(0), None);
        assert_eq!(positive_quantity(-3), None);
        assert_eq!(positive_quantity(5).map(NonZeroU32::get), Some(5));
        assert_eq!(positive_quantity(i64::MAX).map(NonZeroU32::get), Some(u32::MAX));
    }

    #[test]
    fn uses_default_key() {
        let store = CartStore::new(InMemoryStorage::new());

        assert_eq!(store.key(), "ecommerceCart");
    }

    #[test]
    fn load_without_state_is_clean_and_empty() {
        let store = CartStore::new(InMemoryStorage::new());

        let outcome = store.load();

        assert!(!outcome.is_degraded());
        assert!(outcome.value().is_empty());
    }

    #[test]
    fn add_item_persists_under_key() -> TestResult {
        let mut store = CartStore::with_key(InMemoryStorage::new(), "cart");

        let cart = store.add_item(&shirt()).into_result()?;

        let stored = store.storage().get("cart")?;
        assert_eq!(stored, Some(serde_json::to_string(&cart)?));

        Ok(())
    }

    #[test]
    fn unparseable_state_is_a_read_failure() -> TestResult {
        let mut storage = InMemoryStorage::new();
        storage.set(DEFAULT_STORAGE_KEY, "{not json")?;

        let store = CartStore::new(storage);
        let outcome = store.load();

        assert!(outcome.value().is_empty());
        assert!(
            matches!(
                outcome.read_failure(),
                Some(PersistenceFailure::Read { source: ReadError::Parse(_), .. })
            ),
            "expected parse failure, got {:?}",
            outcome.failures()
        );

        Ok(())
    }

    #[test]
    fn storage_read_error_falls_back_to_empty_cart() {
        let store = CartStore::new(FlakyStorage {
            fail_reads: true,
            ..FlakyStorage::default()
        });

        let outcome = store.load();

        assert!(outcome.value().is_empty());
        assert!(
            matches!(
                outcome.read_failure(),
                Some(PersistenceFailure::Read { source: ReadError::Storage(_), .. })
            ),
            "expected storage failure, got {:?}",
            outcome.failures()
        );
    }

    #[test]
    fn write_failure_still_returns_mutated_cart() -> TestResult {
        let mut store = CartStore::new(FlakyStorage {
            fail_writes: true,
            ..FlakyStorage::default()
        });

        let outcome = store.add_item(&shirt());

        assert_eq!(outcome.value().len(), 1);
        assert!(outcome.write_failure().is_some(), "expected write failure");
        assert!(outcome.read_failure().is_none(), "read should have succeeded");

        assert!(store.load().into_result()?.is_empty(), "nothing should be saved");

        Ok(())
    }

    #[test]
    fn corrupt_state_is_replaced_on_next_mutation() -> TestResult {
        let mut storage = InMemoryStorage::new();
        storage.set(DEFAULT_STORAGE_KEY, "[{\"id\":1}]")?;

        let mut store = CartStore::new(storage);
        let outcome = store.add_item(&shirt());

        assert!(outcome.read_failure().is_some(), "expected read failure");
        assert!(outcome.write_failure().is_none(), "write should succeed");
        assert_eq!(outcome.value().len(), 1);

        assert_eq!(store.load().into_result()?.len(), 1);

        Ok(())
    }

    #[test]
    fn set_quantity_on_missing_id_does_not_write() {
        let mut store = CartStore::new(InMemoryStorage::new());

        let outcome = store.set_quantity(&ProductId::Number(4), 3);

        assert!(outcome.value().is_empty());
        assert!(store.storage().is_empty(), "nothing should have been written");
    }

    #[test]
    fn quota_rejection_is_reported_as_write_failure() -> TestResult {
        let mut store = CartStore::new(InMemoryStorage::with_quota(20));

        let outcome = store.add_item(&shirt());

        assert!(
            matches!(
                outcome.write_failure(),
                Some(PersistenceFailure::Write {
                    source: WriteError::Storage(StorageError::Rejected { .. }),
                    ..
                })
            ),
            "expected quota rejection, got {:?}",
            outcome.failures()
        );
        assert_eq!(outcome.value().len(), 1);
        assert!(store.load().into_result()?.is_empty(), "nothing should be saved");

        Ok(())
    }
}
