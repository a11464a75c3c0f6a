//! Prices
//!
//! Shared helpers for the `"AMOUNT CUR"` price notation used by fixture files
//! and basket snapshots, plus currency-safe comparison of money values.

use std::cmp::Ordering;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso, iso::Currency};
use thiserror::Error;

/// Errors from parsing or formatting price notation.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The string was not in the expected `"AMOUNT CUR"` shape.
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Parse price notation (e.g., "24 MAD" or "2.99 GBP") into minor units and currency.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), PriceError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(PriceError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| PriceError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| PriceError::InvalidPrice(s.to_string()))?;

    let currency = iso::find(currency_code)
        .ok_or_else(|| PriceError::UnknownCurrency((*currency_code).to_string()))?;

    let scale = Decimal::new(10_i64.pow(currency.exponent), 0);

    let minor_units = amount
        .checked_mul(scale)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| PriceError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Format a money value in the same notation [`parse_price`] accepts.
/// Trailing fraction zeros are dropped, so whole amounts print as "48 MAD".
#[must_use]
pub fn format_price(money: &Money<'_, Currency>) -> String {
    format!(
        "{} {}",
        money.amount().normalize(),
        money.currency().iso_alpha_code
    )
}

/// Compare two money values of the same currency by minor units.
///
/// # Errors
///
/// Returns a [`MoneyError::CurrencyMismatch`] if the currencies differ.
pub fn cmp_minor(
    a: &Money<'_, Currency>,
    b: &Money<'_, Currency>,
) -> Result<Ordering, MoneyError> {
    if a.currency() != b.currency() {
        return Err(MoneyError::CurrencyMismatch {
            expected: a.currency().iso_alpha_code,
            actual: b.currency().iso_alpha_code,
        });
    }

    Ok(a.to_minor_units().cmp(&b.to_minor_units()))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, MAD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_whole_amount() -> TestResult {
        let (minor, currency) = parse_price("399 MAD")?;

        assert_eq!(minor, 39900);
        assert_eq!(currency, MAD);

        Ok(())
    }

    #[test]
    fn parse_fractional_amount() -> TestResult {
        let (minor, currency) = parse_price("2.99 GBP")?;

        assert_eq!(minor, 299);
        assert_eq!(currency, GBP);

        Ok(())
    }

    #[test]
    fn parse_rejects_missing_currency() {
        assert!(matches!(
            parse_price("299"),
            Err(PriceError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_rejects_unknown_currency() {
        assert!(matches!(
            parse_price("299 ZZZ"),
            Err(PriceError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn format_round_trips_through_parse() -> TestResult {
        let money = Money::from_minor(2450, MAD);
        let formatted = format_price(&money);
        let (minor, currency) = parse_price(&formatted)?;

        assert_eq!(minor, 2450);
        assert_eq!(currency, MAD);

        Ok(())
    }

    #[test]
    fn cmp_minor_orders_same_currency() -> TestResult {
        let smaller = Money::from_minor(100, MAD);
        let larger = Money::from_minor(200, MAD);

        assert_eq!(cmp_minor(&smaller, &larger)?, Ordering::Less);
        assert_eq!(cmp_minor(&larger, &smaller)?, Ordering::Greater);
        assert_eq!(cmp_minor(&smaller, &smaller)?, Ordering::Equal);

        Ok(())
    }

    #[test]
    fn cmp_minor_rejects_currency_mismatch() {
        let mad = Money::from_minor(100, MAD);
        let gbp = Money::from_minor(100, GBP);

        assert_eq!(
            cmp_minor(&mad, &gbp),
            Err(MoneyError::CurrencyMismatch {
                expected: MAD.iso_alpha_code,
                actual: GBP.iso_alpha_code,
            })
        );
    }
}
