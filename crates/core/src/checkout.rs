//! Checkout
//!
//! Per-session checkout state: an owned basket, the promotion catalog, the
//! storefront policy, and the at-most-one applied-promotion slot. A session is
//! created per shopper and handed to whoever needs it; nothing is
//! process-global. Codes are validated when applied; every breakdown read
//! re-derives from current state, so a promotion invalidated by later item
//! removal silently contributes nothing.

use jiff::civil::Date;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    basket::{Basket, BasketError, BasketTotals},
    items::LineItem,
    orders::{CustomerDetails, Order, OrderCodeGenerator, OrderSink, SinkError},
    prices::format_price,
    pricing::{
        self, CheckoutBreakdown, CheckoutPolicy, FreeShippingProgress, PricingError,
    },
    products::ProductId,
    promotions::{PromoError, Promotion, PromotionCatalog},
};

/// Errors from checkout session operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Wrapped basket mutation or totals error.
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// Wrapped promotion validation error.
    #[error(transparent)]
    Promo(#[from] PromoError),

    /// Wrapped pricing derivation error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped order hand-off error.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// A shopper's checkout session.
#[derive(Debug)]
pub struct Checkout<'a> {
    basket: Basket<'a>,
    catalog: PromotionCatalog<'a>,
    policy: CheckoutPolicy,
    order_codes: OrderCodeGenerator,
    applied: Option<Promotion<'a>>,
}

impl<'a> Checkout<'a> {
    /// Start an empty session with the given catalog and policy.
    pub fn new(catalog: PromotionCatalog<'a>, policy: CheckoutPolicy) -> Self {
        let basket = Basket::new(policy.currency());

        Self {
            basket,
            catalog,
            policy,
            order_codes: OrderCodeGenerator::default(),
            applied: None,
        }
    }

    /// Resume a session from an existing basket (e.g., restored from durable
    /// client storage).
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` if the basket's currency differs from the
    /// policy's.
    pub fn with_basket(
        basket: Basket<'a>,
        catalog: PromotionCatalog<'a>,
        policy: CheckoutPolicy,
    ) -> Result<Self, CheckoutError> {
        if basket.currency() != policy.currency() {
            return Err(CheckoutError::Basket(BasketError::CurrencyMismatch(
                basket.currency().iso_alpha_code,
                policy.currency().iso_alpha_code,
            )));
        }

        Ok(Self {
            basket,
            catalog,
            policy,
            order_codes: OrderCodeGenerator::default(),
            applied: None,
        })
    }

    /// Replace the order-code generator.
    #[must_use]
    pub fn with_order_codes(mut self, order_codes: OrderCodeGenerator) -> Self {
        self.order_codes = order_codes;
        self
    }

    /// The session's basket.
    pub fn basket(&self) -> &Basket<'a> {
        &self.basket
    }

    /// The session's policy.
    pub fn policy(&self) -> &CheckoutPolicy {
        &self.policy
    }

    /// The session's promotion catalog.
    pub fn catalog(&self) -> &PromotionCatalog<'a> {
        &self.catalog
    }

    /// Add an item to the basket. See [`Basket::add`].
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` on a currency mismatch or totals overflow.
    pub fn add_item(&mut self, item: LineItem<'a>) -> Result<BasketTotals<'a>, CheckoutError> {
        Ok(self.basket.add(item)?)
    }

    /// Remove every entry for a product. See [`Basket::remove`].
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` if the new totals cannot be calculated.
    pub fn remove_product(
        &mut self,
        product: &ProductId,
    ) -> Result<BasketTotals<'a>, CheckoutError> {
        Ok(self.basket.remove(product)?)
    }

    /// Set a product's quantity. See [`Basket::set_quantity`].
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` if the new totals cannot be calculated.
    pub fn set_quantity(
        &mut self,
        product: &ProductId,
        quantity: u32,
    ) -> Result<BasketTotals<'a>, CheckoutError> {
        Ok(self.basket.set_quantity(product, quantity)?)
    }

    /// Empty the basket. The applied promotion stays in its slot; with a zero
    /// subtotal it simply pays out nothing.
    pub fn clear_basket(&mut self) -> BasketTotals<'a> {
        debug!("clearing basket");

        self.basket.clear()
    }

    /// Validate and apply a promotion code at the current subtotal, replacing
    /// any previously applied promotion.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` if the code is unknown, the subtotal is below
    /// the code's qualifying minimum, or the subtotal cannot be calculated.
    /// The applied slot is left untouched on error.
    pub fn apply_code(&mut self, code: &str) -> Result<&Promotion<'a>, CheckoutError> {
        let subtotal = self.basket.subtotal()?;
        let promotion = self.catalog.try_apply(code, &subtotal)?.clone();

        info!(code = %promotion.code(), "applied promotion");

        Ok(&*self.applied.insert(promotion))
    }

    /// Clear the applied promotion. Never fails; clearing an empty slot is a
    /// no-op.
    pub fn remove_code(&mut self) {
        if let Some(promotion) = self.applied.take() {
            debug!(code = %promotion.code(), "removed promotion");
        }
    }

    /// The currently applied promotion, if any. Whether it still pays out is
    /// decided by [`Self::breakdown`] on every call.
    pub fn applied_promotion(&self) -> Option<&Promotion<'a>> {
        self.applied.as_ref()
    }

    /// Derive the current checkout breakdown.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` if the subtotal or the breakdown cannot be
    /// calculated.
    pub fn breakdown(&self) -> Result<CheckoutBreakdown<'a>, CheckoutError> {
        let subtotal = self.basket.subtotal()?;

        Ok(pricing::checkout_breakdown(
            subtotal,
            self.applied.as_ref(),
            &self.policy,
        )?)
    }

    /// Derive the free-shipping progress for the current breakdown.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` if the breakdown cannot be calculated.
    pub fn free_shipping_progress(&self) -> Result<FreeShippingProgress<'a>, CheckoutError> {
        let breakdown = self.breakdown()?;

        Ok(pricing::free_shipping_progress(&breakdown, &self.policy)?)
    }

    /// Confirm the checkout: snapshot the ledger and breakdown, mint an order
    /// code for the given date, and hand the order to the sink.
    ///
    /// Submission neither clears the basket nor rolls anything back if the
    /// sink fails after the code was minted; both are the caller's policy.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` if the breakdown cannot be calculated or the
    /// sink rejects the hand-off.
    pub fn submit<R, S>(
        &self,
        customer: CustomerDetails,
        date: Date,
        rng: &mut R,
        sink: &mut S,
    ) -> Result<Order<'a>, CheckoutError>
    where
        R: Rng + ?Sized,
        S: OrderSink,
    {
        let totals = self.breakdown()?;
        let code = self.order_codes.mint(date, rng);
        let order = Order::new(code, self.basket.items().to_vec(), totals, customer);

        info!(
            code = %order.code(),
            total = %format_price(&totals.total()),
            "submitting order"
        );

        sink.deliver(&order)?;

        Ok(order)
    }
}
