//! Utils

use clap::Parser;

/// Arguments for the checkout example
#[derive(Debug, Parser)]
pub struct ExampleCheckoutArgs {
    /// Fixture set to use for the catalog & basket
    #[clap(short, long, default_value = "storefront")]
    pub fixture: String,

    /// Promo code to apply at checkout
    #[clap(short, long)]
    pub promo: Option<String>,
}
