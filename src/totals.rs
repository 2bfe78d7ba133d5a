//! Totals

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::cart::Cart;

/// Aggregate amounts of a cart at a point in time. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Sum of `price × quantity` over all lines
    pub subtotal: Decimal,

    /// Sum of `discount × quantity` over all lines
    pub total_discount: Decimal,

    /// `subtotal − total_discount`; negative when discounts exceed prices
    pub final_total: Decimal,

    /// Sum of quantities over all lines
    pub total_items: u64,
}

impl Totals {
    /// Subtotal in the given currency
    pub fn subtotal_money(&self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_decimal(self.subtotal, currency)
    }

    /// Total discount in the given currency
    pub fn discount_money(&self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_decimal(self.total_discount, currency)
    }

    /// Final total in the given currency
    pub fn final_total_money(&self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_decimal(self.final_total, currency)
    }
}

/// Computes the totals of a cart.
///
/// Discounts are per-unit absolute amounts. No floor is applied, so the final
/// total goes negative if discounts exceed prices.
pub fn compute_totals(cart: &Cart) -> Totals {
    let (subtotal, total_discount, total_items) = cart.iter().fold(
        (Decimal::ZERO, Decimal::ZERO, 0_u64),
        |(subtotal, discount, items), item| {
            (
                subtotal.saturating_add(item.line_subtotal()),
                discount.saturating_add(item.line_discount()),
                items.saturating_add(u64::from(item.quantity().get())),
            )
        },
    );

    Totals {
        subtotal,
        total_discount,
        final_total: subtotal.saturating_sub(total_discount),
        total_items,
    }
}
