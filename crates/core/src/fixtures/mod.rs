//! Fixtures
//!
//! YAML-driven product, promotion and basket sets for demos and integration
//! tests. The engine accepts any [`PromotionCatalog`] regardless of origin;
//! fixtures are just a convenient static, versioned source.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    fixtures::{items::ItemsFixture, products::ProductsFixture, promotions::PromotionsFixture},
    items::{LineItem, variants::VariantSelections},
    prices::PriceError,
    products::{Product, ProductId},
    promotions::{Promotion, PromotionCatalog},
};

pub mod items;
pub mod products;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Wrapped price notation error
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Percentage value was negative or not finite
    #[error("Invalid percentage: {0}")]
    InvalidPercentage(f64),

    /// Currency mismatch between fixture entries
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Basket creation error
    #[error("Failed to create basket: {0}")]
    Basket(#[from] BasketError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products keyed by their fixture key
    products: FxHashMap<String, Product<'static>>,

    /// Pre-built promotions
    promotions: Vec<Promotion<'static>>,

    /// Pre-built basket lines (reference products by key)
    items: Vec<LineItem<'static>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture rooted at the crate's `fixtures/` directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path(Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"))
    }

    /// Create a new empty fixture with a custom base path.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
            promotions: Vec::new(),
            items: Vec::new(),
            currency: None,
        }
    }

    /// Load a complete fixture set: `<set>/products.yml`,
    /// `<set>/promotions.yml` and `<set>/items.yml` under the default base
    /// path.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three files cannot be read or parsed.
    pub fn from_set(set: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();
        fixture.base_path = fixture.base_path.join(set);

        fixture.load_products("products")?;
        fixture.load_promotions("promotions")?;
        fixture.load_items("items")?;

        Ok(fixture)
    }

    /// Load products from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if entries
    /// mix currencies.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            let product: Product<'static> = product_fixture.try_into()?;
            let currency = product.price.currency();

            if let Some(existing) = self.currency {
                if existing != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.products.insert(key, product);
        }

        Ok(self)
    }

    /// Load promotions from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: PromotionsFixture = serde_norway::from_str(&contents)?;

        for (_key, promotion_fixture) in fixture.promotions {
            self.promotions.push(promotion_fixture.try_into_promotion()?);
        }

        Ok(self)
    }

    /// Load basket lines from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a line
    /// references a product that was not loaded.
    pub fn load_items(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ItemsFixture = serde_norway::from_str(&contents)?;

        for line in fixture.items {
            let product = self
                .products
                .get(&line.product)
                .ok_or_else(|| FixtureError::ProductNotFound(line.product.clone()))?;

            let variants = VariantSelections::from_pairs(
                line.variants
                    .iter()
                    .map(|(group, option)| (group.clone(), option.clone())),
            );

            self.items.push(LineItem::new(
                ProductId::new(line.product),
                variants,
                line.quantity,
                product.price,
            ));
        }

        Ok(self)
    }

    /// Look up a loaded product by its fixture key.
    pub fn product(&self, key: &str) -> Option<&Product<'static>> {
        self.products.get(key)
    }

    /// The loaded products, keyed by fixture key.
    #[must_use]
    pub fn products(&self) -> &FxHashMap<String, Product<'static>> {
        &self.products
    }

    /// The loaded promotions.
    #[must_use]
    pub fn promotions(&self) -> &[Promotion<'static>] {
        &self.promotions
    }

    /// Build a promotion catalog from the loaded promotions.
    #[must_use]
    pub fn catalog(&self) -> PromotionCatalog<'static> {
        PromotionCatalog::new(self.promotions.iter().cloned())
    }

    /// The pre-built basket lines.
    #[must_use]
    pub fn items(&self) -> &[LineItem<'static>] {
        &self.items
    }

    /// The currency of the fixture set.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] before any products were loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Build a basket holding the pre-built lines.
    ///
    /// # Errors
    ///
    /// Returns an error if no products were loaded or a line cannot be added.
    pub fn basket(&self) -> Result<Basket<'static>, FixtureError> {
        let mut basket = Basket::new(self.currency()?);

        for item in &self.items {
            basket.add(item.clone())?;
        }

        Ok(basket)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
