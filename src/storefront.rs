//! Storefront
//!
//! The user-facing actions of the catalog page: add to cart, increase and
//! decrease quantities, remove, clear and checkout. Every action goes through
//! the [`CartStore`] and callers re-render from [`Storefront::view`].

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartLineItem},
    catalog::Catalog,
    products::ProductId,
    storage::KeyValueStorage,
    store::{CartStore, Outcome, PersistenceFailure},
    totals::Totals,
};

/// Errors from storefront actions.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The catalog has no product with this id.
    #[error("Product {0} is not in the catalog")]
    UnknownProduct(ProductId),

    /// The cart has no line for this id.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The persisted cart could not be read, so its lines are unknown.
    #[error("Cart could not be read: {0}")]
    CartUnreadable(#[source] PersistenceFailure),
}

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineView {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Units in the cart
    pub quantity: u32,

    /// Unit price after the per-unit discount
    pub unit_price: Money<'static, Currency>,

    /// Unit price after discount times quantity
    pub line_total: Money<'static, Currency>,
}

impl LineView {
    fn from_item(item: &CartLineItem, currency: &'static Currency) -> Self {
        Self {
            id: item.id().clone(),
            name: item.name().to_string(),
            quantity: item.quantity().get(),
            unit_price: Money::from_decimal(item.unit_price_after_discount(), currency),
            line_total: Money::from_decimal(item.line_total(), currency),
        }
    }
}

/// Render-ready snapshot of a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    /// Lines in cart order
    pub lines: Vec<LineView>,

    /// Raw totals
    pub totals: Totals,

    /// Subtotal before discounts
    pub subtotal: Money<'static, Currency>,

    /// Sum of discounts
    pub discount: Money<'static, Currency>,

    /// Amount payable
    pub total: Money<'static, Currency>,

    /// Units across all lines, shown on the cart counter
    pub item_count: u64,
}

impl CartView {
    /// Builds the view of `cart` in `currency`.
    pub fn from_cart(cart: &Cart, currency: &'static Currency) -> Self {
        let totals = cart.totals();

        Self {
            lines: cart
                .iter()
                .map(|item| LineView::from_item(item, currency))
                .collect(),
            totals,
            subtotal: totals.subtotal_money(currency),
            discount: totals.discount_money(currency),
            total: totals.final_total_money(currency),
            item_count: totals.total_items,
        }
    }

    /// Check if the cart had no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Result of a checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum Checkout {
    /// The cart was purchased and cleared; holds the purchased cart.
    Completed(CartView),

    /// Nothing to purchase.
    EmptyCart,
}

/// Catalog plus persisted cart.
#[derive(Debug)]
pub struct Storefront<S> {
    catalog: Catalog,
    store: CartStore<S>,
    currency: &'static Currency,
}

impl<S: KeyValueStorage> Storefront<S> {
    /// Create a storefront.
    pub fn new(catalog: Catalog, store: CartStore<S>, currency: &'static Currency) -> Self {
        Self {
            catalog,
            store,
            currency,
        }
    }

    /// The product catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart store.
    pub fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// Display currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Adds one unit of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownProduct`] if the id is not in the catalog.
    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<Outcome<Cart>, StorefrontError> {
        let product = self
            .catalog
            .get(id)
            .ok_or_else(|| StorefrontError::UnknownProduct(id.clone()))?;

        let outcome = self.store.add_item(product);

        info!(product_id = %id, name = %product.name, "added to cart");

        Ok(outcome)
    }

    /// Adds one more unit of a line already in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotInCart`] if the cart has no line for `id`,
    /// or [`StorefrontError::CartUnreadable`] if the persisted cart cannot be
    /// read.
    pub fn increase(&mut self, id: &ProductId) -> Result<Outcome<Cart>, StorefrontError> {
        let current = self.current_quantity(id)?;

        Ok(self.store.set_quantity(id, current.saturating_add(1)))
    }

    /// Takes one unit off a line; the line is removed when it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotInCart`] if the cart has no line for `id`,
    /// or [`StorefrontError::CartUnreadable`] if the persisted cart cannot be
    /// read.
    pub fn decrease(&mut self, id: &ProductId) -> Result<Outcome<Cart>, StorefrontError> {
        let current = self.current_quantity(id)?;

        Ok(self.store.set_quantity(id, current.saturating_sub(1).max(0)))
    }

    /// Sets the quantity of a line; zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotInCart`] if the cart has no line for `id`,
    /// or [`StorefrontError::CartUnreadable`] if the persisted cart cannot be
    /// read.
    pub fn set_quantity(
        &mut self,
        id: &ProductId,
        quantity: i64,
    ) -> Result<Outcome<Cart>, StorefrontError> {
        self.current_quantity(id)?;

        Ok(self.store.set_quantity(id, quantity))
    }

    /// Removes a line from the cart. Missing lines are ignored.
    pub fn remove(&mut self, id: &ProductId) -> Outcome<Cart> {
        self.store.remove_item(id)
    }

    /// Empties the cart.
    pub fn clear(&mut self) -> Outcome<Cart> {
        self.store.clear()
    }

    /// Purchases the cart: a non-empty cart is cleared and its view returned.
    pub fn checkout(&mut self) -> Outcome<Checkout> {
        let (cart, mut failures) = self.store.load().into_parts();

        if cart.is_empty() {
            return Outcome::new(Checkout::EmptyCart, failures);
        }

        let view = CartView::from_cart(&cart, self.currency);

        let (_, clear_failures) = self.store.clear().into_parts();
        failures.extend(clear_failures);

        info!(items = view.item_count, total = %view.total, "checkout completed");

        Outcome::new(Checkout::Completed(view), failures)
    }

    /// Re-reads the cart and builds its view.
    pub fn view(&self) -> Outcome<CartView> {
        let currency = self.currency;

        self.store
            .load()
            .map(|cart| CartView::from_cart(&cart, currency))
    }

    fn current_quantity(&self, id: &ProductId) -> Result<i64, StorefrontError> {
        self.store
            .try_load()
            .map_err(StorefrontError::CartUnreadable)?
            .get(id)
            .map(|item| i64::from(item.quantity().get()))
            .ok_or_else(|| StorefrontError::NotInCart(id.clone()))
    }
}
