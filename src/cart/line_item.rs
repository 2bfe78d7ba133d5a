//! Cart line items

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::{Product, ProductId};

/// One product's aggregated entry in a cart.
///
/// Price and discount are captured when the product is first added and are not
/// refreshed on later adds. The quantity can never be zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    id: ProductId,

    name: String,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    price: Decimal,

    #[serde(default, with = "rust_decimal::serde::arbitrary_precision")]
    discount: Decimal,

    quantity: NonZeroU32,
}

impl CartLineItem {
    /// Creates a new line item.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        discount: Decimal,
        quantity: NonZeroU32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            discount,
            quantity,
        }
    }

    /// Creates a line item for a single unit of the product, capturing its
    /// current price and discount.
    pub fn from_product(product: &Product) -> Self {
        Self::new(
            product.id.clone(),
            product.name.clone(),
            product.price,
            product.discount_or_zero(),
            NonZeroU32::MIN,
        )
    }

    /// Returns the product id of the line item
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Returns the product name captured at insertion
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price captured at insertion
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the per-unit discount captured at insertion
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Returns the quantity
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }

    pub(crate) fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Unit price with the discount taken off. Not floored at zero.
    pub fn unit_price_after_discount(&self) -> Decimal {
        self.price.saturating_sub(self.discount)
    }

    /// `price × quantity`
    pub fn line_subtotal(&self) -> Decimal {
        self.price.saturating_mul(self.quantity_decimal())
    }

    /// `discount × quantity`
    pub fn line_discount(&self) -> Decimal {
        self.discount.saturating_mul(self.quantity_decimal())
    }

    /// Amount payable for the whole line after discounts.
    pub fn line_total(&self) -> Decimal {
        self.unit_price_after_discount()
            .saturating_mul(self.quantity_decimal())
    }

    fn quantity_decimal(&self) -> Decimal {
        Decimal::from(self.quantity.get())
    }
}
