//! Basket Snapshots
//!
//! Serializable form of the ledger for durable client-side storage. The item
//! list and the aggregate pair travel together; a snapshot whose recorded
//! aggregates disagree with its items is rejected on restore, so storage
//! round-trips `(items, items_count, subtotal)` together or not at all.

use rustc_hash::FxHashMap;
use rusty_money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    items::{LineItem, variants::VariantSelections},
    prices::{PriceError, format_price, parse_price},
    products::ProductId,
};

/// Errors from restoring a basket snapshot.
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    /// Wrapped price notation error.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Wrapped basket mutation error.
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// The recorded aggregates do not match the recorded items.
    #[error(
        "Snapshot aggregates disagree with items: recorded {recorded_count} / {recorded_subtotal}, derived {derived_count} / {derived_subtotal}"
    )]
    Inconsistent {
        /// Items count recorded in the snapshot
        recorded_count: u32,

        /// Subtotal recorded in the snapshot
        recorded_subtotal: String,

        /// Items count derived from the snapshot's items
        derived_count: u32,

        /// Subtotal derived from the snapshot's items
        derived_subtotal: String,
    },
}

/// One line item in price-notation form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemSnapshot {
    /// Product id
    pub product: String,

    /// Chosen variant options, option-group name to value
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub variants: FxHashMap<String, String>,

    /// Quantity
    pub quantity: u32,

    /// Unit price in `"AMOUNT CUR"` notation
    pub unit_price: String,
}

/// Serializable snapshot of a basket and its aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketSnapshot {
    /// Line items in display order
    pub items: Vec<LineItemSnapshot>,

    /// Sum of quantities recorded at snapshot time
    pub items_count: u32,

    /// Subtotal recorded at snapshot time, in `"AMOUNT CUR"` notation
    pub subtotal: String,
}

impl BasketSnapshot {
    /// Rebuild a basket from this snapshot, verifying that the recorded
    /// aggregates still describe the recorded items.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if a price cannot be parsed, an item cannot
    /// be re-added, or the aggregates are inconsistent with the items.
    pub fn restore(&self) -> Result<Basket<'static>, SnapshotError> {
        let (recorded_minor, currency) = parse_price(&self.subtotal)?;

        let mut basket = Basket::new(currency);

        for entry in &self.items {
            let (unit_minor, unit_currency) = parse_price(&entry.unit_price)?;
            let variants = VariantSelections::from_pairs(
                entry
                    .variants
                    .iter()
                    .map(|(group, option)| (group.clone(), option.clone())),
            );

            basket.add(LineItem::new(
                ProductId::new(entry.product.clone()),
                variants,
                entry.quantity,
                Money::from_minor(unit_minor, unit_currency),
            ))?;
        }

        let derived = basket.totals()?;

        if derived.items_count != self.items_count
            || derived.subtotal.to_minor_units() != recorded_minor
        {
            return Err(SnapshotError::Inconsistent {
                recorded_count: self.items_count,
                recorded_subtotal: self.subtotal.clone(),
                derived_count: derived.items_count,
                derived_subtotal: format_price(&derived.subtotal),
            });
        }

        Ok(basket)
    }
}

impl Basket<'_> {
    /// Capture the ledger and its aggregates as a serializable snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`BasketError`] if the current totals cannot be calculated.
    pub fn snapshot(&self) -> Result<BasketSnapshot, BasketError> {
        let totals = self.totals()?;

        let items = self
            .iter()
            .map(|item| LineItemSnapshot {
                product: item.product().as_str().to_string(),
                variants: item
                    .variants()
                    .iter()
                    .map(|(group, option)| (group.to_string(), option.to_string()))
                    .collect(),
                quantity: item.quantity(),
                unit_price: format_price(item.unit_price()),
            })
            .collect();

        Ok(BasketSnapshot {
            items,
            items_count: totals.items_count,
            subtotal: format_price(&totals.subtotal),
        })
    }
}
