//! Pricing
//!
//! Pure derivation of a checkout breakdown from a subtotal and the currently
//! applied promotion. The derivation happens in a fixed order: discount, then
//! shipping, then the VAT share already embedded in tax-inclusive prices, then
//! the grand total. Promotion eligibility is re-decided on every call, so a
//! promotion whose qualifying minimum is no longer met contributes nothing
//! without anyone having to remove it.
//!
//! All derived amounts are whole currency units; the storefront displays
//! prices without fraction digits.

use std::cmp::Ordering;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso, iso::Currency};
use thiserror::Error;

use crate::{
    prices::cmp_minor,
    promotions::{Promotion, PromotionKind},
};

/// Errors that can occur while deriving a checkout breakdown.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// An intermediate amount could not be represented.
    #[error("amount could not be represented during checkout pricing")]
    Arithmetic,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// The storefront's checkout constants.
#[derive(Debug, Clone)]
pub struct CheckoutPolicy {
    currency: &'static Currency,
    free_shipping_threshold: Money<'static, Currency>,
    flat_shipping_fee: Money<'static, Currency>,
    vat_rate: Percentage,
}

impl CheckoutPolicy {
    /// Create a policy. Threshold and fee are given in major currency units.
    #[must_use]
    pub fn new(
        currency: &'static Currency,
        free_shipping_threshold: i64,
        flat_shipping_fee: i64,
        vat_rate: Percentage,
    ) -> Self {
        Self {
            currency,
            free_shipping_threshold: Money::from_major(free_shipping_threshold, currency),
            flat_shipping_fee: Money::from_major(flat_shipping_fee, currency),
            vat_rate,
        }
    }

    /// The reference cash-on-delivery storefront policy: free shipping from
    /// 399 MAD, a 39 MAD flat fee below that, and 20% VAT included in prices.
    #[must_use]
    pub fn mad() -> Self {
        Self::new(iso::MAD, 399, 39, Percentage::from(0.20))
    }

    /// The policy's currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Subtotal (after discount) from which shipping is free.
    pub fn free_shipping_threshold(&self) -> &Money<'static, Currency> {
        &self.free_shipping_threshold
    }

    /// Flat fee charged below the free-shipping threshold.
    pub fn flat_shipping_fee(&self) -> &Money<'static, Currency> {
        &self.flat_shipping_fee
    }

    /// VAT rate already embedded in displayed prices.
    #[must_use]
    pub fn vat_rate(&self) -> Percentage {
        self.vat_rate
    }
}

/// The derived checkout amounts, in application order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutBreakdown<'a> {
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    after_discount: Money<'a, Currency>,
    shipping: Money<'a, Currency>,
    tax_included: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> CheckoutBreakdown<'a> {
    /// Subtotal before any promotion.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount the applied promotion takes off the subtotal.
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Subtotal net of the discount, never below zero.
    pub fn after_discount(&self) -> Money<'a, Currency> {
        self.after_discount
    }

    /// Shipping fee charged for this order.
    pub fn shipping(&self) -> Money<'a, Currency> {
        self.shipping
    }

    /// VAT share already contained in the discounted subtotal. Informational;
    /// it is never added on top.
    pub fn tax_included(&self) -> Money<'a, Currency> {
        self.tax_included
    }

    /// Amount due on delivery.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }
}

/// Progress toward the free-shipping threshold, for a UI affordance.
#[derive(Debug, Clone, Copy)]
pub struct FreeShippingProgress<'a> {
    ratio: Percentage,
    remaining: Money<'a, Currency>,
}

impl<'a> FreeShippingProgress<'a> {
    /// How far along the discounted subtotal is, clamped to [0, 1].
    #[must_use]
    pub fn ratio(&self) -> Percentage {
        self.ratio
    }

    /// Amount still missing before shipping becomes free.
    pub fn remaining(&self) -> Money<'a, Currency> {
        self.remaining
    }
}

/// Derive the checkout breakdown for a subtotal under the given promotion and
/// policy.
///
/// The function is deterministic and side-effect free. A promotion that does
/// not qualify (subtotal below its minimum, or a mismatched currency) is
/// neutralised rather than rejected: its discount evaluates to zero and
/// shipping falls back to the threshold rule.
///
/// # Errors
///
/// Returns a [`PricingError`] if the subtotal's currency differs from the
/// policy's, or if an intermediate amount cannot be represented. Neither can
/// occur for well-formed single-currency input.
pub fn checkout_breakdown<'a>(
    subtotal: Money<'a, Currency>,
    promotion: Option<&Promotion<'_>>,
    policy: &CheckoutPolicy,
) -> Result<CheckoutBreakdown<'a>, PricingError> {
    let currency = policy.currency();

    if subtotal.currency() != currency {
        return Err(PricingError::Money(MoneyError::CurrencyMismatch {
            expected: currency.iso_alpha_code,
            actual: subtotal.currency().iso_alpha_code,
        }));
    }

    let zero = Money::from_minor(0, currency);

    let discount = match promotion {
        Some(promo) if promo.is_eligible_at(&subtotal) => match promo.kind() {
            PromotionKind::Percent(percent) => {
                let raw = (*percent) * *subtotal.amount();
                let major = whole_units(raw, RoundingStrategy::ToNegativeInfinity)?;
                cap_at(Money::from_major(major, currency), &subtotal)?
            }
            PromotionKind::AmountOff(amount) => {
                if amount.currency() == currency {
                    cap_at(Money::from_minor(amount.to_minor_units(), currency), &subtotal)?
                } else {
                    zero
                }
            }
            PromotionKind::FreeShipping => zero,
        },
        _ => zero,
    };

    let after_discount = subtotal.sub(discount)?;

    let free_via_promotion = matches!(
        promotion,
        Some(promo) if matches!(promo.kind(), PromotionKind::FreeShipping)
            && promo.is_eligible_at(&after_discount)
    );
    let reaches_threshold =
        cmp_minor(&after_discount, policy.free_shipping_threshold())? != Ordering::Less;

    let shipping = if free_via_promotion || reaches_threshold {
        zero
    } else {
        Money::from_minor(policy.flat_shipping_fee().to_minor_units(), currency)
    };

    let tax_included = included_tax(&after_discount, policy.vat_rate())?;

    let total = after_discount.add(shipping)?;

    Ok(CheckoutBreakdown {
        subtotal,
        discount,
        after_discount,
        shipping,
        tax_included,
        total,
    })
}

/// Derive the free-shipping progress for an already-computed breakdown.
///
/// # Errors
///
/// Returns a [`PricingError`] on a currency mismatch between the breakdown and
/// the policy.
pub fn free_shipping_progress<'a>(
    breakdown: &CheckoutBreakdown<'a>,
    policy: &CheckoutPolicy,
) -> Result<FreeShippingProgress<'a>, PricingError> {
    let after = breakdown.after_discount();
    let threshold = policy.free_shipping_threshold();

    // Validates the currencies besides ordering.
    let reached = cmp_minor(&after, threshold)? != Ordering::Less;

    let remaining_minor = if reached {
        0
    } else {
        threshold
            .to_minor_units()
            .saturating_sub(after.to_minor_units())
            .max(0)
    };

    let threshold_amount = *threshold.amount();
    let ratio = if threshold_amount <= Decimal::ZERO {
        Decimal::ONE
    } else {
        after
            .amount()
            .checked_div(threshold_amount)
            .ok_or(PricingError::Arithmetic)?
            .clamp(Decimal::ZERO, Decimal::ONE)
    };

    Ok(FreeShippingProgress {
        ratio: Percentage::from(ratio),
        remaining: Money::from_minor(remaining_minor, policy.currency()),
    })
}

/// Round a decimal amount to whole currency units with the given strategy.
fn whole_units(amount: Decimal, strategy: RoundingStrategy) -> Result<i64, PricingError> {
    amount
        .round_dp_with_strategy(0, strategy)
        .to_i64()
        .ok_or(PricingError::Arithmetic)
}

/// Cap a discount at the subtotal so the net never drops below zero.
fn cap_at<'a>(
    discount: Money<'a, Currency>,
    subtotal: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    if cmp_minor(&discount, subtotal)? == Ordering::Greater {
        Ok(*subtotal)
    } else {
        Ok(discount)
    }
}

/// Extract the VAT share embedded in a tax-inclusive amount:
/// `amount * rate / (1 + rate)`, rounded half away from zero to whole units.
fn included_tax<'a>(
    amount: &Money<'a, Currency>,
    vat_rate: Percentage,
) -> Result<Money<'a, Currency>, PricingError> {
    let rate = vat_rate * Decimal::ONE;
    let divisor = Decimal::ONE
        .checked_add(rate)
        .ok_or(PricingError::Arithmetic)?;

    let share = amount
        .amount()
        .checked_mul(rate)
        .ok_or(PricingError::Arithmetic)?
        .checked_div(divisor)
        .ok_or(PricingError::Arithmetic)?;

    Ok(Money::from_major(
        whole_units(share, RoundingStrategy::MidpointAwayFromZero)?,
        amount.currency(),
    ))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::MAD;
    use testresult::TestResult;

    use super::*;

    fn percent(code: &str, value: f64, min_subtotal: i64) -> Promotion<'static> {
        Promotion::new(
            code,
            PromotionKind::Percent(Percentage::from(value)),
            Money::from_major(min_subtotal, MAD),
        )
    }

    fn amount_off(code: &str, value: i64, min_subtotal: i64) -> Promotion<'static> {
        Promotion::new(
            code,
            PromotionKind::AmountOff(Money::from_major(value, MAD)),
            Money::from_major(min_subtotal, MAD),
        )
    }

    fn free_shipping(code: &str, min_subtotal: i64) -> Promotion<'static> {
        Promotion::new(
            code,
            PromotionKind::FreeShipping,
            Money::from_major(min_subtotal, MAD),
        )
    }

    #[test]
    fn percent_discount_floors_to_whole_units() -> TestResult {
        let promo = percent("WELCOME10", 0.10, 0);
        let breakdown =
            checkout_breakdown(Money::from_major(299, MAD), Some(&promo), &CheckoutPolicy::mad())?;

        assert_eq!(breakdown.discount(), Money::from_major(29, MAD));
        assert_eq!(breakdown.after_discount(), Money::from_major(270, MAD));

        Ok(())
    }

    #[test]
    fn fixed_discount_is_capped_at_the_subtotal() -> TestResult {
        let promo = amount_off("FLAT50", 50, 0);
        let breakdown =
            checkout_breakdown(Money::from_major(40, MAD), Some(&promo), &CheckoutPolicy::mad())?;

        assert_eq!(breakdown.discount(), Money::from_major(40, MAD));
        assert_eq!(breakdown.after_discount(), Money::from_major(0, MAD));
        assert_eq!(breakdown.total(), Money::from_major(39, MAD));

        Ok(())
    }

    #[test]
    fn ineligible_promotion_contributes_nothing() -> TestResult {
        let promo = percent("WELCOME10", 0.10, 399);
        let breakdown =
            checkout_breakdown(Money::from_major(200, MAD), Some(&promo), &CheckoutPolicy::mad())?;

        assert_eq!(breakdown.discount(), Money::from_major(0, MAD));
        assert_eq!(breakdown.after_discount(), Money::from_major(200, MAD));

        Ok(())
    }

    #[test]
    fn shipping_is_free_at_the_threshold() -> TestResult {
        let policy = CheckoutPolicy::mad();

        let at = checkout_breakdown(Money::from_major(399, MAD), None, &policy)?;
        assert_eq!(at.shipping(), Money::from_major(0, MAD));
        assert_eq!(at.total(), Money::from_major(399, MAD));

        let below = checkout_breakdown(Money::from_major(398, MAD), None, &policy)?;
        assert_eq!(below.shipping(), Money::from_major(39, MAD));
        assert_eq!(below.total(), Money::from_major(437, MAD));

        Ok(())
    }

    #[test]
    fn discount_can_push_an_order_back_under_the_threshold() -> TestResult {
        // 410 - 41 = 369 after discount, so the flat fee applies again.
        let promo = percent("WELCOME10", 0.10, 0);
        let breakdown =
            checkout_breakdown(Money::from_major(410, MAD), Some(&promo), &CheckoutPolicy::mad())?;

        assert_eq!(breakdown.after_discount(), Money::from_major(369, MAD));
        assert_eq!(breakdown.shipping(), Money::from_major(39, MAD));

        Ok(())
    }

    #[test]
    fn free_shipping_promotion_respects_its_own_minimum() -> TestResult {
        let policy = CheckoutPolicy::mad();
        let promo = free_shipping("FREESHIP", 399);

        let at = checkout_breakdown(Money::from_major(399, MAD), Some(&promo), &policy)?;
        assert_eq!(at.discount(), Money::from_major(0, MAD));
        assert_eq!(at.shipping(), Money::from_major(0, MAD));

        let below = checkout_breakdown(Money::from_major(398, MAD), Some(&promo), &policy)?;
        assert_eq!(below.shipping(), Money::from_major(39, MAD));

        Ok(())
    }

    #[test]
    fn free_shipping_promotion_below_the_general_threshold() -> TestResult {
        // The promotion forces shipping free even though 250 < 399.
        let promo = free_shipping("SHIPFREE", 200);
        let breakdown =
            checkout_breakdown(Money::from_major(250, MAD), Some(&promo), &CheckoutPolicy::mad())?;

        assert_eq!(breakdown.shipping(), Money::from_major(0, MAD));
        assert_eq!(breakdown.total(), Money::from_major(250, MAD));

        Ok(())
    }

    #[test]
    fn vat_share_is_extracted_not_added() -> TestResult {
        let breakdown =
            checkout_breakdown(Money::from_major(120, MAD), None, &CheckoutPolicy::mad())?;

        assert_eq!(breakdown.tax_included(), Money::from_major(20, MAD));
        assert_eq!(breakdown.total(), Money::from_major(159, MAD));

        Ok(())
    }

    #[test]
    fn vat_share_rounds_half_away_from_zero() -> TestResult {
        // 45 * 0.2 / 1.2 = 7.5, which rounds up to 8.
        let breakdown =
            checkout_breakdown(Money::from_major(45, MAD), None, &CheckoutPolicy::mad())?;

        assert_eq!(breakdown.tax_included(), Money::from_major(8, MAD));

        Ok(())
    }

    #[test]
    fn empty_cart_prices_to_zero_with_flat_shipping() -> TestResult {
        let breakdown = checkout_breakdown(Money::from_major(0, MAD), None, &CheckoutPolicy::mad())?;

        assert_eq!(breakdown.discount(), Money::from_major(0, MAD));
        assert_eq!(breakdown.tax_included(), Money::from_major(0, MAD));
        assert_eq!(breakdown.shipping(), Money::from_major(39, MAD));

        Ok(())
    }

    #[test]
    fn currency_mismatch_is_rejected() {
        let result = checkout_breakdown(
            Money::from_major(100, rusty_money::iso::USD),
            None,
            &CheckoutPolicy::mad(),
        );

        assert!(matches!(result, Err(PricingError::Money(_))));
    }

    #[test]
    fn progress_is_clamped_and_tracks_the_remaining_amount() -> TestResult {
        let policy = CheckoutPolicy::mad();

        let partway = checkout_breakdown(Money::from_major(300, MAD), None, &policy)?;
        let progress = free_shipping_progress(&partway, &policy)?;
        assert_eq!(progress.remaining(), Money::from_major(99, MAD));

        let past = checkout_breakdown(Money::from_major(500, MAD), None, &policy)?;
        let progress = free_shipping_progress(&past, &policy)?;
        assert_eq!(progress.ratio() * Decimal::ONE, Decimal::ONE);
        assert_eq!(progress.remaining(), Money::from_major(0, MAD));

        Ok(())
    }

    #[test]
    fn progress_accounts_for_the_discount() -> TestResult {
        let policy = CheckoutPolicy::mad();
        let promo = amount_off("TUSSNA50", 50, 399);

        let breakdown = checkout_breakdown(Money::from_major(400, MAD), Some(&promo), &policy)?;
        let progress = free_shipping_progress(&breakdown, &policy)?;

        assert_eq!(breakdown.after_discount(), Money::from_major(350, MAD));
        assert_eq!(progress.remaining(), Money::from_major(49, MAD));

        Ok(())
    }
}
