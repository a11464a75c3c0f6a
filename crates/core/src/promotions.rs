//! Promotions
//!
//! A static, finite catalog of promotion codes known at build time. A code is
//! validated once at apply time; whether it still pays out is re-decided by the
//! pricing calculator on every recompute, so a promotion that was valid when
//! applied simply stops contributing once the basket shrinks below its
//! qualifying minimum.

use std::{cmp::Ordering, fmt};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso, iso::Currency};
use thiserror::Error;

use crate::prices::cmp_minor;

/// Errors from applying a promotion code.
#[derive(Debug, Error, PartialEq)]
pub enum PromoError {
    /// No promotion matches the normalised code.
    #[error("Unknown promotion code: {0}")]
    NotFound(String),

    /// The current subtotal is below the promotion's qualifying minimum.
    #[error("Subtotal must be at least {minimum} {currency} to use this code")]
    BelowMinimum {
        /// The qualifying minimum, in major units
        minimum: Decimal,

        /// ISO code of the promotion's currency
        currency: &'static str,
    },

    /// Wrapped money comparison error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A promotion code, normalised by trimming whitespace and upper-casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromoCode(String);

impl PromoCode {
    /// Normalise a raw code as typed by the shopper.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Return the normalised code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PromoCode {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// What a promotion pays out once its qualifying minimum is met.
#[derive(Debug, Clone, PartialEq)]
pub enum PromotionKind<'a> {
    /// Percentage off the basket subtotal (e.g., 10% off).
    Percent(Percentage),

    /// Fixed amount off the basket subtotal, capped at the subtotal itself.
    AmountOff(Money<'a, Currency>),

    /// Shipping is free; the subtotal is untouched.
    FreeShipping,
}

/// A promotion: a code, a payout kind, and a qualifying subtotal minimum.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion<'a> {
    code: PromoCode,
    kind: PromotionKind<'a>,
    min_subtotal: Money<'a, Currency>,
}

impl<'a> Promotion<'a> {
    /// Create a new promotion.
    pub fn new(
        code: impl Into<PromoCode>,
        kind: PromotionKind<'a>,
        min_subtotal: Money<'a, Currency>,
    ) -> Self {
        Self {
            code: code.into(),
            kind,
            min_subtotal,
        }
    }

    /// Return the normalised code.
    pub fn code(&self) -> &PromoCode {
        &self.code
    }

    /// Return the payout kind.
    pub fn kind(&self) -> &PromotionKind<'a> {
        &self.kind
    }

    /// Return the qualifying subtotal minimum (pre-discount).
    pub fn min_subtotal(&self) -> &Money<'a, Currency> {
        &self.min_subtotal
    }

    /// Whether the promotion qualifies at the given amount. A currency
    /// mismatch never qualifies.
    pub fn is_eligible_at(&self, amount: &Money<'_, Currency>) -> bool {
        cmp_minor(amount, &self.min_subtotal).is_ok_and(|ordering| ordering != Ordering::Less)
    }
}

/// The static promotion catalog, keyed by normalised code.
#[derive(Debug, Default)]
pub struct PromotionCatalog<'a> {
    promotions: FxHashMap<PromoCode, Promotion<'a>>,
}

impl<'a> PromotionCatalog<'a> {
    /// Build a catalog from a list of promotions. A code defined more than
    /// once keeps the last definition.
    pub fn new(promotions: impl IntoIterator<Item = Promotion<'a>>) -> Self {
        Self {
            promotions: promotions
                .into_iter()
                .map(|promotion| (promotion.code.clone(), promotion))
                .collect(),
        }
    }

    /// The reference storefront catalog.
    #[must_use]
    pub fn storefront() -> PromotionCatalog<'static> {
        PromotionCatalog::new([
            Promotion::new(
                "WELCOME10",
                PromotionKind::Percent(Percentage::from(0.10)),
                Money::from_major(299, iso::MAD),
            ),
            Promotion::new(
                "TUSSNA50",
                PromotionKind::AmountOff(Money::from_major(50, iso::MAD)),
                Money::from_major(399, iso::MAD),
            ),
            Promotion::new(
                "FREESHIP",
                PromotionKind::FreeShipping,
                Money::from_major(399, iso::MAD),
            ),
        ])
    }

    /// Look up a promotion by code.
    pub fn get(&self, code: &PromoCode) -> Option<&Promotion<'a>> {
        self.promotions.get(code)
    }

    /// Validate an apply-attempt for the given code at the current subtotal.
    /// Nothing is mutated; the caller decides where the returned promotion is
    /// stored.
    ///
    /// # Errors
    ///
    /// - [`PromoError::NotFound`]: no promotion matches the normalised code.
    /// - [`PromoError::BelowMinimum`]: the subtotal does not qualify yet.
    /// - [`PromoError::Money`]: the subtotal and the promotion use different
    ///   currencies.
    pub fn try_apply(
        &self,
        code: &str,
        current_subtotal: &Money<'_, Currency>,
    ) -> Result<&Promotion<'a>, PromoError> {
        let normalized = PromoCode::new(code);

        let promotion = self
            .promotions
            .get(&normalized)
            .ok_or_else(|| PromoError::NotFound(normalized.to_string()))?;

        if cmp_minor(current_subtotal, &promotion.min_subtotal)? == Ordering::Less {
            return Err(PromoError::BelowMinimum {
                minimum: promotion.min_subtotal.amount().normalize(),
                currency: promotion.min_subtotal.currency().iso_alpha_code,
            });
        }

        Ok(promotion)
    }

    /// Iterate over the promotions in the catalog.
    pub fn iter(&self) -> impl Iterator<Item = &Promotion<'a>> {
        self.promotions.values()
    }

    /// Number of promotions in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.promotions.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.promotions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::{MAD, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn codes_normalise_case_and_whitespace() {
        assert_eq!(PromoCode::new("  welcome10 "), PromoCode::new("WELCOME10"));
        assert_eq!(PromoCode::new("tussna50").as_str(), "TUSSNA50");
    }

    #[test]
    fn try_apply_matches_case_insensitively() -> TestResult {
        let catalog = PromotionCatalog::storefront();
        let subtotal = Money::from_major(500, MAD);

        let promotion = catalog.try_apply(" welcome10 ", &subtotal)?;

        assert_eq!(promotion.code(), &PromoCode::new("WELCOME10"));

        Ok(())
    }

    #[test]
    fn try_apply_rejects_unknown_code() {
        let catalog = PromotionCatalog::storefront();
        let subtotal = Money::from_major(500, MAD);

        assert_eq!(
            catalog.try_apply("NOPE", &subtotal),
            Err(PromoError::NotFound("NOPE".to_string()))
        );
    }

    #[test]
    fn try_apply_rejects_subtotal_below_minimum() {
        let catalog = PromotionCatalog::storefront();
        let subtotal = Money::from_major(100, MAD);

        assert_eq!(
            catalog.try_apply("WELCOME10", &subtotal),
            Err(PromoError::BelowMinimum {
                minimum: Decimal::new(299, 0),
                currency: MAD.iso_alpha_code,
            })
        );
    }

    #[test]
    fn try_apply_accepts_subtotal_at_exact_minimum() -> TestResult {
        let catalog = PromotionCatalog::storefront();
        let subtotal = Money::from_major(299, MAD);

        catalog.try_apply("WELCOME10", &subtotal)?;

        Ok(())
    }

    #[test]
    fn try_apply_surfaces_currency_mismatch() {
        let catalog = PromotionCatalog::storefront();
        let subtotal = Money::from_major(500, USD);

        assert!(matches!(
            catalog.try_apply("WELCOME10", &subtotal),
            Err(PromoError::Money(_))
        ));
    }

    #[test]
    fn duplicate_codes_keep_the_last_definition() {
        let catalog = PromotionCatalog::new([
            Promotion::new(
                "STACKED",
                PromotionKind::Percent(Percentage::from(0.05)),
                Money::from_major(0, MAD),
            ),
            Promotion::new(
                "STACKED",
                PromotionKind::FreeShipping,
                Money::from_major(0, MAD),
            ),
        ]);

        assert_eq!(catalog.len(), 1);
        let promotion = catalog.get(&PromoCode::new("STACKED"));
        assert!(matches!(
            promotion.map(Promotion::kind),
            Some(PromotionKind::FreeShipping)
        ));
    }

    #[test]
    fn eligibility_fails_on_currency_mismatch() {
        let promotion = Promotion::new(
            "FREESHIP",
            PromotionKind::FreeShipping,
            Money::from_major(399, MAD),
        );

        assert!(promotion.is_eligible_at(&Money::from_major(400, MAD)));
        assert!(!promotion.is_eligible_at(&Money::from_major(400, USD)));
    }
}
