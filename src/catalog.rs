//! Catalog
//!
//! The ordered, read-only product list shown on the storefront.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// A product has a negative price
    #[error("Product {0} has a negative price: {1}")]
    NegativePrice(ProductId, Decimal),

    /// A product has a negative discount
    #[error("Product {0} has a negative discount: {1}")]
    NegativeDiscount(ProductId, Decimal),
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

/// Catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// Create a catalog from products, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns an error if two products share an id or a price or discount is
    /// negative.
    pub fn with_products(products: impl Into<Vec<Product>>) -> Result<Self, CatalogError> {
        let products = products.into();
        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            if product.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice(product.id.clone(), product.price));
            }

            let discount = product.discount_or_zero();

            if discount < Decimal::ZERO {
                return Err(CatalogError::NegativeDiscount(product.id.clone(), discount));
            }

            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Self { products, index })
    }

    /// Parse a catalog from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or the products fail validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_norway::from_str(yaml)?;

        Self::with_products(file.products)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Get a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|position| self.products.get(*position))
    }

    /// Iterate over the products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Get the number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
