//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLineItem},
    catalog::{Catalog, CatalogError},
    products::{Product, ProductId},
    receipt::{CartReceipt, CatalogListing, ReceiptError},
    storage::{FileStorage, InMemoryStorage, KeyValueStorage, StorageError},
    store::{CartStore, DEFAULT_STORAGE_KEY, Outcome, PersistenceFailure, ReadError, WriteError},
    storefront::{CartView, Checkout, LineView, Storefront, StorefrontError},
    totals::{Totals, compute_totals},
};
