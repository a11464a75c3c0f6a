//! Promotion Fixtures

use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    prices::parse_price,
    promotions::{Promotion, PromotionKind},
};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Map of promotion key -> promotion fixture
    pub promotions: FxHashMap<String, PromotionFixture>,
}

/// Promotion fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromotionFixture {
    /// Percentage off the subtotal
    Percent {
        /// Promotion code
        code: String,

        /// Fraction taken off (e.g., 0.10 for 10%)
        value: f64,

        /// Qualifying subtotal minimum (e.g., "299 MAD")
        min_subtotal: String,
    },

    /// Fixed amount off the subtotal
    AmountOff {
        /// Promotion code
        code: String,

        /// Amount taken off (e.g., "50 MAD")
        amount: String,

        /// Qualifying subtotal minimum
        min_subtotal: String,
    },

    /// Free shipping once the minimum is met
    FreeShipping {
        /// Promotion code
        code: String,

        /// Qualifying subtotal minimum
        min_subtotal: String,
    },
}

impl PromotionFixture {
    /// Convert to a [`Promotion`].
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed or the percentage value is
    /// not a finite, non-negative number.
    pub fn try_into_promotion(self) -> Result<Promotion<'static>, FixtureError> {
        match self {
            PromotionFixture::Percent {
                code,
                value,
                min_subtotal,
            } => {
                if !value.is_finite() || value < 0.0 {
                    return Err(FixtureError::InvalidPercentage(value));
                }

                Ok(Promotion::new(
                    code.as_str(),
                    PromotionKind::Percent(Percentage::from(value)),
                    money(&min_subtotal)?,
                ))
            }
            PromotionFixture::AmountOff {
                code,
                amount,
                min_subtotal,
            } => Ok(Promotion::new(
                code.as_str(),
                PromotionKind::AmountOff(money(&amount)?),
                money(&min_subtotal)?,
            )),
            PromotionFixture::FreeShipping { code, min_subtotal } => Ok(Promotion::new(
                code.as_str(),
                PromotionKind::FreeShipping,
                money(&min_subtotal)?,
            )),
        }
    }
}

fn money(notation: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(notation)?;

    Ok(Money::from_minor(minor_units, currency))
}
