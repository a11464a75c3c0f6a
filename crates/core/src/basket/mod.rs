//! Basket
//!
//! The authoritative cart ledger. Every mutation returns a fresh
//! [`BasketTotals`] snapshot so the item list and its aggregates are always
//! observed together; there is no cached state to fall out of sync.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    items::{LineItem, LineItemError},
    products::ProductId,
};

pub mod snapshot;

/// Errors related to basket mutations or totals.
#[derive(Debug, Error, PartialEq)]
pub enum BasketError {
    /// An item's currency differs from the basket currency (item currency, basket currency).
    #[error("Item has currency {0}, but basket has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped line-item arithmetic error.
    #[error(transparent)]
    LineItem(#[from] LineItemError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Aggregates derived from the basket's items, published with every mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasketTotals<'a> {
    /// Sum of quantities across all line items
    pub items_count: u32,

    /// Sum of `unit_price * quantity` across all line items
    pub subtotal: Money<'a, Currency>,
}

/// Basket
#[derive(Debug)]
pub struct Basket<'a> {
    items: Vec<LineItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Basket<'a> {
    /// Create a new, empty basket in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Basket {
            items: Vec::new(),
            currency,
        }
    }

    /// Add an item, merging it into an existing entry when the product and
    /// variant selections match. Adding the same product twice is expected
    /// behaviour, not an error.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError` if the item's currency differs from the basket
    /// currency, or if the new totals cannot be calculated.
    pub fn add(&mut self, item: LineItem<'a>) -> Result<BasketTotals<'a>, BasketError> {
        let item_currency = item.unit_price().currency();
        if item_currency != self.currency {
            return Err(BasketError::CurrencyMismatch(
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(existing) = self.items.iter_mut().find(|entry| entry.merges_with(&item)) {
            existing.add_quantity(item.quantity());
        } else {
            self.items.push(item);
        }

        self.totals()
    }

    /// Remove every entry carrying the given product id, across all variant
    /// selections. Removing an id that is not in the basket is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError` if the new totals cannot be calculated.
    pub fn remove(&mut self, product: &ProductId) -> Result<BasketTotals<'a>, BasketError> {
        self.items.retain(|entry| entry.product() != product);

        self.totals()
    }

    /// Set the quantity of the first entry matching the product id, clamping
    /// values below 1 up to 1. An id that is not in the basket is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError` if the new totals cannot be calculated.
    pub fn set_quantity(
        &mut self,
        product: &ProductId,
        quantity: u32,
    ) -> Result<BasketTotals<'a>, BasketError> {
        if let Some(entry) = self
            .items
            .iter_mut()
            .find(|entry| entry.product() == product)
        {
            entry.set_quantity(quantity);
        }

        self.totals()
    }

    /// Empty the basket.
    pub fn clear(&mut self) -> BasketTotals<'a> {
        self.items.clear();

        BasketTotals {
            items_count: 0,
            subtotal: Money::from_minor(0, self.currency),
        }
    }

    /// Calculate the current aggregates.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError` if a line total or the subtotal overflows.
    pub fn totals(&self) -> Result<BasketTotals<'a>, BasketError> {
        let mut items_count: u32 = 0;
        let mut subtotal = Money::from_minor(0, self.currency);

        for item in &self.items {
            items_count = items_count.saturating_add(item.quantity());
            subtotal = subtotal.add(item.line_total()?)?;
        }

        Ok(BasketTotals {
            items_count,
            subtotal,
        })
    }

    /// Calculate the subtotal of the basket.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError` if a line total or the subtotal overflows.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, BasketError> {
        Ok(self.totals()?.subtotal)
    }

    /// Sum of quantities across all line items.
    #[must_use]
    pub fn items_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity()))
    }

    /// The line items in display (insertion) order.
    #[must_use]
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Iterate over the items in the basket.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.items.iter()
    }

    /// Get the number of distinct line entries in the basket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the basket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the basket.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
