//! Souk
//!
//! Souk is a cart pricing, promotion and cash-on-delivery checkout engine for a
//! client-rendered storefront: a basket ledger with always-consistent
//! aggregates, a static promotion catalog with apply-time validation, a pure
//! checkout pricing calculator, and order submission with human-readable order
//! codes.

pub mod basket;
pub mod checkout;
pub mod fixtures;
pub mod items;
pub mod orders;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod summary;
pub mod utils;
