//! Item Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Wrapper for items in YAML
#[derive(Debug, Deserialize)]
pub struct ItemsFixture {
    /// Basket lines referencing products by key
    pub items: Vec<ItemFixture>,
}

/// One basket line in YAML
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Product key reference
    pub product: String,

    /// Quantity (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Variant selections, option group -> chosen option
    #[serde(default)]
    pub variants: FxHashMap<String, String>,
}

fn default_quantity() -> u32 {
    1
}
