//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

/// Identifier shared by catalog products and cart line items.
///
/// Storefront pages hand out either numeric or textual ids, so both are
/// accepted. `1` and `"1"` are distinct ids.
///
/// Numeric ids must be non-negative integers that fit in a `u64`. A stored
/// cart holding a negative or fractional numeric id does not deserialize, so
/// the store reports it as a read failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric id
    Number(u64),

    /// Textual id
    Text(String),
}

impl ProductId {
    /// Parses a command-line style id: digits become a numeric id, anything
    /// else is kept as text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        trimmed
            .parse::<u64>()
            .map_or_else(|_err| Self::Text(trimmed.to_string()), Self::Number)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Number(id) => Display::fmt(id, f),
            Self::Text(id) => Display::fmt(id, f),
        }
    }
}

// Numbers are read through `Value` because serde_json's arbitrary precision
// numbers do not survive the buffering an untagged derive does.
impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(number) => number.as_u64().map(Self::Number).ok_or_else(|| {
                de::Error::custom(format!(
                    "product id must be a non-negative integer or a string, got {number}"
                ))
            }),
            Value::String(text) => Ok(Self::Text(text)),
            other => Err(de::Error::custom(format!(
                "product id must be a non-negative integer or a string, got {other}"
            ))),
        }
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Product
///
/// Prices are trusted as given; no pricing authority sits behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,

    /// Absolute per-unit discount, if any
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::arbitrary_precision_option"
    )]
    pub discount: Option<Decimal>,

    /// Image location
    #[serde(default)]
    pub image: String,
}

impl Product {
    /// Creates a product without a discount or image.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            discount: None,
            image: String::new(),
        }
    }

    /// Sets the per-unit discount.
    #[must_use]
    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Sets the image location.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Per-unit discount, zero when the product has none.
    pub fn discount_or_zero(&self) -> Decimal {
        self.discount.unwrap_or(Decimal::ZERO)
    }
}
