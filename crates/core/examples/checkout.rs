//! Checkout Example
//!
//! Demonstrates the full cart-to-order flow: load a fixture set, apply a promo
//! code, show the free-shipping progress, submit the order and print its
//! summary.
//!
//! Use `-f` to load a fixture set by name
//! Use `-p` to apply a promo code at checkout

use std::io;

use anyhow::Result;
use clap::Parser;
use jiff::Zoned;
use souk::{
    checkout::Checkout,
    fixtures::Fixture,
    orders::{CustomerDetails, RecordingSink},
    prices::format_price,
    pricing::CheckoutPolicy,
    summary::write_summary,
    utils::ExampleCheckoutArgs,
};

/// Checkout Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExampleCheckoutArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let mut checkout =
        Checkout::with_basket(fixture.basket()?, fixture.catalog(), CheckoutPolicy::mad())?;

    if let Some(code) = args.promo.as_deref() {
        match checkout.apply_code(code) {
            Ok(promotion) => println!("Applied promo {}", promotion.code()),
            Err(error) => println!("Could not apply {code}: {error}"),
        }
    }

    let progress = checkout.free_shipping_progress()?;
    println!(
        "{} away from free shipping\n",
        format_price(&progress.remaining())
    );

    let customer = CustomerDetails {
        full_name: "Amina El Fassi".to_string(),
        phone: "0607076940".to_string(),
        city: "Casablanca".to_string(),
        address: "12 Rue des Orangers".to_string(),
        notes: None,
        preferred_time: Some("18h-20h".to_string()),
    };

    let mut sink = RecordingSink::new();
    let order = checkout.submit(
        customer,
        Zoned::now().date(),
        &mut rand::thread_rng(),
        &mut sink,
    )?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_summary(&mut handle, &order)?;

    Ok(())
}
