//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shop_commerce::cart::DEFAULT_CART_KEY;
use shop_commerce::pricing::PricingConfig;

/// Config file names looked up in the working directory and its parents.
pub const CONFIG_NAMES: [&str; 3] = ["shop.toml", ".shop.toml", "shop.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the cart is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Pricing parameters.
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };

        config
            .pricing
            .validate()
            .with_context(|| format!("Invalid pricing in {}", path.display()))?;
        Ok(config)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Cart storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the store, relative to the config file.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Key the cart is saved under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_dir() -> String {
    ".shop".to_string()
}

fn default_cart_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            cart_key: default_cart_key(),
        }
    }
}

/// Generate a default shop.toml config file.
pub fn generate_default_config() -> String {
    let pricing = PricingConfig::default();
    format!(
        r#"# Storefront cart configuration

[storage]
dir = "{dir}"
cart_key = "{cart_key}"

[pricing]
currency = "{currency}"
# 800 basis points = 8%
tax_rate_bps = {tax}
# Subtotals strictly above this ship free
free_shipping_threshold = {threshold}
flat_shipping_fee = {fee}
# Value of one loyalty point
point_value = {point}
"#,
        dir = default_dir(),
        cart_key = DEFAULT_CART_KEY,
        currency = pricing.currency.code(),
        tax = pricing.tax_rate_bps,
        threshold = pricing.free_shipping_threshold,
        fee = pricing.flat_shipping_fee,
        point = pricing.point_value,
    )
}
