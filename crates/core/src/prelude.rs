//! Souk prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{
        Basket, BasketError, BasketTotals,
        snapshot::{BasketSnapshot, SnapshotError},
    },
    checkout::{Checkout, CheckoutError},
    fixtures::{Fixture, FixtureError},
    items::{LineItem, LineItemError, variants::VariantSelections},
    orders::{
        CustomerDetails, Order, OrderCode, OrderCodeGenerator, OrderSink, RecordingSink,
        SinkError, normalize_phone,
    },
    prices::{PriceError, cmp_minor, format_price, parse_price},
    pricing::{
        CheckoutBreakdown, CheckoutPolicy, FreeShippingProgress, PricingError,
        checkout_breakdown, free_shipping_progress,
    },
    products::{Product, ProductId, VariantGroup},
    promotions::{PromoCode, PromoError, Promotion, PromotionCatalog, PromotionKind},
    summary::write_summary,
};
