//! Trolley
//!
//! Trolley is a persisted storefront shopping cart: a product catalog, a cart
//! store that owns the persisted line items and their arithmetic, and the
//! storefront actions and receipts that sit on top of it.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod prelude;
pub mod products;
pub mod receipt;
pub mod storage;
pub mod store;
pub mod storefront;
pub mod totals;
