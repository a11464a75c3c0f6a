//! Order Summary
//!
//! Terminal rendering of a confirmed order for demos and CLI tooling.

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{items::LineItemError, orders::Order, prices::format_price};

/// Errors that can occur when rendering an order summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// IO error writing the summary.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Wrapped line-item arithmetic error.
    #[error(transparent)]
    LineItem(#[from] LineItemError),
}

/// Write a confirmed order as a table of line items followed by the
/// breakdown.
///
/// # Errors
///
/// Returns a [`SummaryError`] if a line total cannot be calculated or the
/// output cannot be written.
pub fn write_summary(mut out: impl io::Write, order: &Order<'_>) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Variants", "Qty", "Unit", "Total"]);

    for item in order.items() {
        let variants = item
            .variants()
            .iter()
            .map(|(group, option)| format!("{group}: {option}"))
            .collect::<Vec<_>>()
            .join(", ");

        builder.push_record([
            item.product().as_str().to_string(),
            variants,
            item.quantity().to_string(),
            format_price(item.unit_price()),
            format_price(&item.line_total()?),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.modify(Columns::new(2..), Alignment::right());

    writeln!(out, "{table}")?;

    let totals = order.totals();

    writeln!(out, "Order {}", order.code())?;
    writeln!(out, "  Subtotal:       {}", format_price(&totals.subtotal()))?;
    writeln!(out, "  Discount:      -{}", format_price(&totals.discount()))?;
    writeln!(out, "  Shipping:       {}", format_price(&totals.shipping()))?;
    writeln!(
        out,
        "  VAT (included): {}",
        format_price(&totals.tax_included())
    )?;
    writeln!(out, "  Total:          {}", format_price(&totals.total()))?;

    Ok(())
}
