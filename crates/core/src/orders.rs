//! Orders
//!
//! Order-code minting and the hand-off payload for the downstream
//! persistence/notification collaborator. Submission is not idempotent: every
//! confirmed checkout mints a fresh code and the engine keeps no deduplication
//! memory, so retry guarding after a failed hand-off belongs to the caller.

use std::fmt;

use jiff::civil::Date;
use rand::Rng;
use thiserror::Error;

use crate::{items::LineItem, pricing::CheckoutBreakdown};

/// Default order-code prefix.
pub const ORDER_CODE_PREFIX: &str = "ORD";

/// Number of random base-36 characters in an order-code suffix. Eight
/// characters give ~2.8e12 combinations, enough that a full day's order volume
/// stays collision-free.
pub const ORDER_CODE_SUFFIX_LEN: usize = 8;

/// A human-readable order identifier: `PREFIX-YYYYMMDD-SUFFIX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderCode(String);

impl OrderCode {
    /// Return the code as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mints order codes with a fixed prefix, a date component and a random
/// suffix.
#[derive(Debug, Clone)]
pub struct OrderCodeGenerator {
    prefix: &'static str,
}

impl Default for OrderCodeGenerator {
    fn default() -> Self {
        Self::new(ORDER_CODE_PREFIX)
    }
}

impl OrderCodeGenerator {
    /// Create a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    /// Mint a fresh order code for the given calendar date.
    pub fn mint<R: Rng + ?Sized>(&self, date: Date, rng: &mut R) -> OrderCode {
        let mut suffix = String::with_capacity(ORDER_CODE_SUFFIX_LEN);

        for _ in 0..ORDER_CODE_SUFFIX_LEN {
            let digit = rng.gen_range(0..36_u32);
            suffix.push(char::from_digit(digit, 36).map_or('0', |c| c.to_ascii_uppercase()));
        }

        OrderCode(format!(
            "{prefix}-{year:04}{month:02}{day:02}-{suffix}",
            prefix = self.prefix,
            year = date.year(),
            month = date.month(),
            day = date.day(),
        ))
    }
}

/// Cash-on-delivery contact and delivery details captured at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetails {
    /// Full name
    pub full_name: String,

    /// Contact phone as entered by the shopper
    pub phone: String,

    /// Delivery city
    pub city: String,

    /// Street address
    pub address: String,

    /// Free-form delivery notes
    pub notes: Option<String>,

    /// Preferred delivery time window
    pub preferred_time: Option<String>,
}

impl CustomerDetails {
    /// Return the contact phone in canonical `+212…` form.
    #[must_use]
    pub fn normalized_phone(&self) -> String {
        normalize_phone(&self.phone)
    }
}

/// Canonicalise a Moroccan phone number to `+212…`: digits are kept, a
/// leading national `0` or an existing `212` country code is folded into the
/// prefix, and anything else is assumed to be a bare subscriber number.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if let Some(rest) = digits.strip_prefix("212") {
        format!("+212{rest}")
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("+212{rest}")
    } else {
        format!("+212{digits}")
    }
}

/// The payload handed to the downstream collaborator on a confirmed checkout:
/// a snapshot of the ledger and breakdown at submission time.
#[derive(Debug, Clone)]
pub struct Order<'a> {
    code: OrderCode,
    items: Vec<LineItem<'a>>,
    totals: CheckoutBreakdown<'a>,
    customer: CustomerDetails,
}

impl<'a> Order<'a> {
    /// Assemble an order from its parts.
    pub fn new(
        code: OrderCode,
        items: Vec<LineItem<'a>>,
        totals: CheckoutBreakdown<'a>,
        customer: CustomerDetails,
    ) -> Self {
        Self {
            code,
            items,
            totals,
            customer,
        }
    }

    /// The minted order code.
    pub fn code(&self) -> &OrderCode {
        &self.code
    }

    /// The line items as they stood at submission time.
    #[must_use]
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// The checkout breakdown as it stood at submission time.
    pub fn totals(&self) -> &CheckoutBreakdown<'a> {
        &self.totals
    }

    /// The customer's contact and delivery details.
    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }
}

/// Errors reported by an order sink.
#[derive(Debug, Error)]
#[error("Order hand-off failed: {reason}")]
pub struct SinkError {
    reason: String,
}

impl SinkError {
    /// Create a sink error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The order persistence/notification collaborator. The engine's contract
/// ends at `deliver`: it neither retries a failed hand-off nor rolls the
/// ledger back.
pub trait OrderSink {
    /// Receive a confirmed order for durable storage and any messaging.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the order could not be taken over.
    fn deliver(&mut self, order: &Order<'_>) -> Result<(), SinkError>;
}

/// An in-memory sink that records delivered order codes, for demos and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    codes: Vec<String>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The codes of all orders delivered so far, in delivery order.
    #[must_use]
    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}

impl OrderSink for RecordingSink {
    fn deliver(&mut self, order: &Order<'_>) -> Result<(), SinkError> {
        self.codes.push(order.code().to_string());

        Ok(())
    }
}
