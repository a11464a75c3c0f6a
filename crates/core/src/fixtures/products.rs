//! Product Fixtures

use rustc_hash::FxHashMap;
use rusty_money::Money;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    prices::parse_price,
    products::{Product, VariantGroup},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product price (e.g., "24 MAD")
    pub price: String,

    /// Whether the product is in stock
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,

    /// Variant option groups offered for the product
    #[serde(default)]
    pub variants: Vec<VariantGroupFixture>,
}

fn default_in_stock() -> bool {
    true
}

/// Variant group fixture
#[derive(Debug, Deserialize)]
pub struct VariantGroupFixture {
    /// Option group name
    pub name: String,

    /// Choices offered within the group
    pub options: Vec<String>,
}

impl TryFrom<ProductFixture> for Product<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(Product {
            name: fixture.name,
            price: Money::from_minor(minor_units, currency),
            in_stock: fixture.in_stock,
            variants: fixture
                .variants
                .into_iter()
                .map(|group| VariantGroup {
                    name: group.name,
                    options: group.options,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::MAD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn product_fixture_parses_price_and_variants() -> TestResult {
        let yaml = r#"
name: Hydrating Body Wash
price: "24 MAD"
variants:
  - name: size
    options: ["250ml", "500ml"]
"#;
        let fixture: ProductFixture = serde_norway::from_str(yaml)?;
        let product = Product::try_from(fixture)?;

        assert_eq!(product.price, Money::from_major(24, MAD));
        assert!(product.in_stock);
        assert_eq!(product.variants.len(), 1);

        Ok(())
    }

    #[test]
    fn product_fixture_rejects_bad_price() -> TestResult {
        let yaml = r#"
name: Broken
price: "twenty-four"
"#;
        let fixture: ProductFixture = serde_norway::from_str(yaml)?;

        assert!(matches!(
            Product::try_from(fixture),
            Err(FixtureError::Price(_))
        ));

        Ok(())
    }
}
