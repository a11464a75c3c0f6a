//! Products
//!
//! Catalog display data lives outside the engine; the checkout path only ever
//! sees a [`ProductId`] and the unit price that was frozen into the line item
//! when it was added.

use std::fmt;

use rusty_money::{Money, iso::Currency};

/// Identifier of a catalog product, assigned by the external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from a raw catalog identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A named option group offered for a product (e.g. "Size" with "250ml"/"500ml").
#[derive(Debug, Clone, PartialEq)]
pub struct VariantGroup {
    /// Option group name
    pub name: String,

    /// Choices offered within the group
    pub options: Vec<String>,
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// Current catalog price
    pub price: Money<'a, Currency>,

    /// Whether the product is currently in stock
    pub in_stock: bool,

    /// Variant option groups offered for this product
    pub variants: Vec<VariantGroup>,
}
