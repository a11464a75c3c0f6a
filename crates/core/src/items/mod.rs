//! Items
//!
//! A line item freezes the unit price at the moment the product is added; the
//! catalog is never re-queried afterwards.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{items::variants::VariantSelections, products::ProductId};

pub mod variants;

/// Errors from line-item arithmetic.
#[derive(Debug, Error, PartialEq)]
pub enum LineItemError {
    /// The line total exceeded the representable money range.
    #[error("line total overflowed for product {0}")]
    TotalOverflow(ProductId),
}

/// A product in the cart with its chosen variants, quantity and frozen unit price.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<'a> {
    product: ProductId,
    variants: VariantSelections,
    quantity: u32,
    unit_price: Money<'a, Currency>,
}

impl<'a> LineItem<'a> {
    /// Create a new line item. A quantity below 1 is silently clamped to 1.
    pub fn new(
        product: ProductId,
        variants: VariantSelections,
        quantity: u32,
        unit_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            product,
            variants,
            quantity: quantity.max(1),
            unit_price,
        }
    }

    /// Return the product id.
    pub fn product(&self) -> &ProductId {
        &self.product
    }

    /// Return the chosen variant options.
    pub fn variants(&self) -> &VariantSelections {
        &self.variants
    }

    /// Return the quantity.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Set the quantity, clamping values below 1 up to 1.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    /// Add to the quantity, saturating at the representable maximum.
    pub fn add_quantity(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity);
    }

    /// Return the unit price frozen at add-time.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Whether this entry and `other` describe the same product with the same
    /// variant selections, and should therefore be merged rather than listed twice.
    pub fn merges_with(&self, other: &LineItem<'_>) -> bool {
        self.product == other.product && self.variants == other.variants
    }

    /// Calculate `unit_price * quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::TotalOverflow`] if the multiplication leaves
    /// the representable money range.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, LineItemError> {
        let minor = self
            .unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or_else(|| LineItemError::TotalOverflow(self.product.clone()))?;

        Ok(Money::from_minor(minor, self.unit_price.currency()))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::MAD;
    use testresult::TestResult;

    use super::*;

    fn item(quantity: u32) -> LineItem<'static> {
        LineItem::new(
            ProductId::new("p11"),
            VariantSelections::none(),
            quantity,
            Money::from_major(24, MAD),
        )
    }

    #[test]
    fn quantity_below_one_is_clamped() {
        assert_eq!(item(0).quantity(), 1);
        assert_eq!(item(3).quantity(), 3);
    }

    #[test]
    fn set_quantity_clamps_to_one() {
        let mut item = item(5);
        item.set_quantity(0);

        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn line_total_multiplies_unit_price() -> TestResult {
        assert_eq!(item(2).line_total()?, Money::from_major(48, MAD));

        Ok(())
    }

    #[test]
    fn line_total_overflow_is_reported() {
        let item = LineItem::new(
            ProductId::new("p11"),
            VariantSelections::none(),
            u32::MAX,
            Money::from_minor(i64::MAX, MAD),
        );

        assert_eq!(
            item.line_total(),
            Err(LineItemError::TotalOverflow(ProductId::new("p11")))
        );
    }

    #[test]
    fn merge_requires_matching_variants() {
        let plain = item(1);
        let sized = LineItem::new(
            ProductId::new("p11"),
            VariantSelections::from_pairs([("size", "250ml")]),
            1,
            Money::from_major(24, MAD),
        );

        assert!(plain.merges_with(&item(2)));
        assert!(!plain.merges_with(&sized));
    }
}
