//! Receipt
//!
//! Terminal rendering of cart views and the product catalog.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{catalog::Catalog, storefront::CartView};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Table of a cart's lines followed by its totals.
#[derive(Debug)]
pub struct CartReceipt<'a> {
    view: &'a CartView,
}

impl<'a> CartReceipt<'a> {
    /// Create a receipt for the given view.
    pub fn new(view: &'a CartView) -> Self {
        Self { view }
    }

    /// Writes the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.view.is_empty() {
            writeln!(out, "Your cart is empty.")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["#", "Item", "Unit Price", "Qty", "Total"]);

        for (idx, line) in self.view.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                line.unit_price.to_string(),
                line.quantity.to_string(),
                line.line_total.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}")?;
        writeln!(out, "Subtotal: {}", self.view.subtotal)?;
        writeln!(out, "Discount: {}", self.view.discount)?;
        writeln!(out, "   Total: {}", self.view.total)?;
        writeln!(out, "   Items: {}", self.view.item_count)?;

        Ok(())
    }
}

/// Table of catalog products with their prices.
#[derive(Debug)]
pub struct CatalogListing<'a> {
    catalog: &'a Catalog,
    currency: &'static Currency,
}

impl<'a> CatalogListing<'a> {
    /// Create a listing of `catalog` priced in `currency`.
    pub fn new(catalog: &'a Catalog, currency: &'static Currency) -> Self {
        Self { catalog, currency }
    }

    /// Writes the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.catalog.is_empty() {
            writeln!(out, "No products available.")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["Id", "Product", "Price", "Discount"]);

        for product in self.catalog.iter() {
            let discount = product.discount_or_zero();

            builder.push_record([
                product.id.to_string(),
                product.name.clone(),
                Money::from_decimal(product.price, self.currency).to_string(),
                if discount > Decimal::ZERO {
                    Money::from_decimal(discount, self.currency).to_string()
                } else {
                    String::new()
                },
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..4), Alignment::right());

        writeln!(out, "\n{table}")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{
        cart::Cart,
        products::{Product, ProductId},
    };

    use super::*;

    fn view() -> CartView {
        let mut cart = Cart::new();

        cart.add_product(&Product::new(1_u64, "Linen shirt", Decimal::from(10)).with_discount(Decimal::from(2)));
        cart.add_product(&Product::new(2_u64, "Wool socks", Decimal::from(5)));
        cart.add_product(&Product::new(1_u64, "Linen shirt", Decimal::from(10)));

        CartView::from_cart(&cart, GBP)
    }

    #[test]
    fn write_to_renders_lines_and_totals() -> TestResult {
        let view = view();
        let mut out = Vec::new();

        CartReceipt::new(&view).write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Linen shirt"));
        assert!(output.contains("Wool socks"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("Discount:"));
        assert!(output.contains("Total:"));
        assert!(output.contains("Items: 3"));

        Ok(())
    }

    #[test]
    fn write_to_renders_empty_message() -> TestResult {
        let view = CartView::from_cart(&Cart::new(), GBP);
        let mut out = Vec::new();

        CartReceipt::new(&view).write_to(&mut out)?;

        assert_eq!(String::from_utf8(out)?, "Your cart is empty.\n");

        Ok(())
    }

    #[test]
    fn catalog_listing_shows_every_product() -> TestResult {
        let catalog = Catalog::with_products([
            Product::new(1_u64, "Linen shirt", Decimal::from(10)).with_discount(Decimal::from(2)),
            Product::new("gift", "Gift card", Decimal::from(50)),
        ])?;
        let mut out = Vec::new();

        CatalogListing::new(&catalog, GBP).write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Linen shirt"));
        assert!(output.contains("Gift card"));
        assert!(output.contains("gift"));
        assert!(output.contains(&ProductId::Number(1).to_string()));

        Ok(())
    }
}
