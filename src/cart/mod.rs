//! Cart

use std::num::NonZeroU32;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    products::{Product, ProductId},
    totals::{Totals, compute_totals},
};

pub mod line_item;

pub use line_item::CartLineItem;

/// Errors related to cart construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// More than one line item carries the same product id.
    #[error("duplicate line item for product {0}")]
    DuplicateItem(ProductId),
}

/// An ordered list of line items, unique by product id.
///
/// Insertion order is preserved. The cart serializes as a bare array of line
/// items; deserializing an array with repeated ids fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create a new, empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart from existing line items.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::DuplicateItem`] if two items share a product id.
    pub fn with_items(items: impl Into<Vec<CartLineItem>>) -> Result<Self, CartError> {
        let items = items.into();
        let mut seen = FxHashSet::default();

        for item in &items {
            if !seen.insert(item.id()) {
                return Err(CartError::DuplicateItem(item.id().clone()));
            }
        }

        Ok(Self { items })
    }

    /// Adds one unit of the product.
    ///
    /// An existing line keeps the price and discount it was created with; only
    /// its quantity grows. A new line is appended with quantity one.
    pub fn add_product(&mut self, product: &Product) {
        if let Some(item) = self.get_mut(&product.id) {
            item.increment();
        } else {
            self.items.push(CartLineItem::from_product(product));
        }
    }

    /// Removes the line item for `id`, returning it if it was present.
    pub fn remove(&mut self, id: &ProductId) -> Option<CartLineItem> {
        let position = self.position(id)?;

        Some(self.items.remove(position))
    }

    /// Sets the quantity of the line item for `id`.
    ///
    /// Returns `false` if the cart has no line for `id`.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: NonZeroU32) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.set_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Get the line item for `id`.
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Index of the line item for `id`.
    pub fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Check if the cart has a line item for `id`.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.position(id).is_some()
    }

    /// Iterate over the line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    /// Line items as a slice.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Get the number of line items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Totals of the cart as it is now.
    pub fn totals(&self) -> Totals {
        compute_totals(self)
    }
}

impl TryFrom<Vec<CartLineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<CartLineItem>) -> Result<Self, Self::Error> {
        Self::with_items(items)
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
