//! Order-code collision sampling.

use jiff::civil::date;
use rand::{SeedableRng, rngs::StdRng};
use rustc_hash::FxHashSet;

use souk::orders::OrderCodeGenerator;

#[test]
fn a_full_day_of_codes_has_no_collisions() {
    let generator = OrderCodeGenerator::default();
    let mut rng = StdRng::seed_from_u64(0xC0C0);
    let day = date(2026, 8, 6);

    let mut seen = FxHashSet::default();

    for minted in 0..10_000 {
        let code = generator.mint(day, &mut rng);

        assert!(
            seen.insert(code.as_str().to_string()),
            "duplicate order code after {minted} mints: {code}"
        );
    }
}

#[test]
fn codes_embed_the_calendar_date() {
    let generator = OrderCodeGenerator::default();
    let mut rng = StdRng::seed_from_u64(1);

    let august = generator.mint(date(2026, 8, 6), &mut rng);
    let september = generator.mint(date(2026, 9, 1), &mut rng);

    assert!(august.as_str().starts_with("ORD-20260806-"));
    assert!(september.as_str().starts_with("ORD-20260901-"));
}
