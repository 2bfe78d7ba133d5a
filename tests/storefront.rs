//! Storefront flows against the bundled catalog and on-disk storage.
//!
//! Every test opens a fresh [`Storefront`] per step over the same directory,
//! the way separate CLI invocations share one persisted cart.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::BRL};
use testresult::TestResult;

use trolley::prelude::*;

fn catalog_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/catalog.yml")
}

fn open(dir: &Path) -> TestResult<Storefront<FileStorage>> {
    let catalog = Catalog::load(catalog_path())?;
    let store = CartStore::new(FileStorage::open(dir)?);

    Ok(Storefront::new(catalog, store, BRL))
}

#[test]
fn bundled_catalog_loads() -> TestResult {
    let catalog = Catalog::load(catalog_path())?;

    assert_eq!(catalog.len(), 6);
    assert!(catalog.get(&ProductId::Number(1)).is_some());
    assert!(catalog.get(&ProductId::Number(7)).is_none());

    Ok(())
}

#[test]
fn cart_survives_reopening() -> TestResult {
    let dir = tempfile::tempdir()?;

    open(dir.path())?.add_to_cart(&ProductId::Number(1))?.into_result()?;
    open(dir.path())?.add_to_cart(&ProductId::Number(1))?.into_result()?;
    open(dir.path())?.add_to_cart(&ProductId::Number(2))?.into_result()?;

    let view = open(dir.path())?.view().into_result()?;

    assert_eq!(view.lines.len(), 2);
    assert_eq!(view.item_count, 3);
    assert_eq!(view.lines.first().map(|line| line.quantity), Some(2));

    assert!(dir.path().join(format!("{DEFAULT_STORAGE_KEY}.json")).is_file());

    Ok(())
}

#[test]
fn unknown_product_is_rejected_without_touching_the_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut shop = open(dir.path())?;

    let result = shop.add_to_cart(&ProductId::Number(7));

    assert!(matches!(result, Err(StorefrontError::UnknownProduct(_))));
    assert!(shop.view().into_result()?.is_empty());
    assert!(!dir.path().join(format!("{DEFAULT_STORAGE_KEY}.json")).exists());

    Ok(())
}

#[test]
fn decrease_to_zero_removes_line() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut shop = open(dir.path())?;

    shop.add_to_cart(&ProductId::Number(4))?.into_result()?;
    shop.increase(&ProductId::Number(4))?.into_result()?;

    let cart = shop.decrease(&ProductId::Number(4))?.into_result()?;
    assert_eq!(cart.get(&ProductId::Number(4)).map(|item| item.quantity().get()), Some(1));

    let cart = shop.decrease(&ProductId::Number(4))?.into_result()?;
    assert!(cart.is_empty());

    assert!(matches!(
        shop.decrease(&ProductId::Number(4)),
        Err(StorefrontError::NotInCart(_))
    ));

    Ok(())
}

#[test]
fn view_prices_lines_after_discount() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut shop = open(dir.path())?;

    // 49.90 with 5.00 off
    shop.add_to_cart(&ProductId::Number(1))?.into_result()?;
    shop.set_quantity(&ProductId::Number(1), 2)?.into_result()?;

    let view = shop.view().into_result()?;

    assert_eq!(view.totals.subtotal, Decimal::new(9980, 2));
    assert_eq!(view.totals.total_discount, Decimal::from(10));
    assert_eq!(view.totals.final_total, Decimal::new(8980, 2));
    assert_eq!(view.total, Money::from_minor(8980, BRL));
    assert_eq!(
        view.lines.first().map(|line| line.unit_price.clone()),
        Some(Money::from_minor(4490, BRL))
    );

    Ok(())
}

#[test]
fn checkout_clears_cart_and_reports_purchase() -> TestResult {
    let dir = tempfile::tempdir()?;

    {
        let mut shop = open(dir.path())?;
        shop.add_to_cart(&ProductId::Number(3))?.into_result()?;
        shop.add_to_cart(&ProductId::Number(5))?.into_result()?;
    }

    let checkout = open(dir.path())?.checkout().into_result()?;

    assert!(
        matches!(&checkout, Checkout::Completed(view) if view.item_count == 2),
        "unexpected checkout: {checkout:?}"
    );
    assert!(open(dir.path())?.view().into_result()?.is_empty());

    assert!(matches!(
        open(dir.path())?.checkout().into_result()?,
        Checkout::EmptyCart
    ));

    Ok(())
}

#[test]
fn corrupt_cart_file_degrades_to_empty_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join(format!("{DEFAULT_STORAGE_KEY}.json")),
        "{ not json",
    )?;

    let mut shop = open(dir.path())?;
    let view = shop.view();

    assert!(view.value().is_empty());
    assert!(view.read_failure().is_some());

    assert!(matches!(
        shop.increase(&ProductId::Number(2)),
        Err(StorefrontError::CartUnreadable(_))
    ));

    let outcome = shop.add_to_cart(&ProductId::Number(2))?;

    assert!(outcome.read_failure().is_some());
    assert!(outcome.write_failure().is_none());
    assert_eq!(outcome.value().len(), 1);

    // The write replaced the unreadable state
    assert!(!shop.view().is_degraded());

    Ok(())
}
