//! Cart line items and the product snapshot they are created from.

use crate::error::CartError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Product data captured when a shopper adds something to the cart.
///
/// This is the boundary type: [`CartProduct::validate`] runs before any
/// mutation so the cart never holds an item without an id or with a
/// negative price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartProduct {
    /// Product key.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in minor currency units.
    pub price: i64,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Brand name.
    #[serde(default)]
    pub brand: Option<String>,
    /// Model name.
    #[serde(default)]
    pub model: Option<String>,
    /// Category key.
    #[serde(default)]
    pub category: Option<String>,
    /// Units in stock. `None` means no limit is enforced client-side.
    #[serde(default)]
    pub stock: Option<u32>,
}

impl CartProduct {
    /// Create a product snapshot with no optional details.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
            brand: None,
            model: None,
            category: None,
            stock: None,
        }
    }

    /// Set the stock limit.
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set brand and model.
    pub fn with_brand(mut self, brand: impl Into<String>, model: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self.model = Some(model.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check the snapshot can become a line item.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.id.is_blank() {
            return Err(CartError::InvalidProduct("missing product id".to_string()));
        }
        if self.price < 0 {
            return Err(CartError::InvalidProduct(format!(
                "negative price {} for {}",
                self.price, self.id
            )));
        }
        Ok(())
    }
}

/// A line in the cart.
///
/// Serialized field names are the persisted format:
/// `{id, name, price, image, brand, model, category, quantity, stock}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLineItem {
    /// Product key, unique within the cart.
    pub id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price in minor currency units.
    pub price: i64,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Brand name.
    #[serde(default)]
    pub brand: Option<String>,
    /// Model name.
    #[serde(default)]
    pub model: Option<String>,
    /// Category key.
    #[serde(default)]
    pub category: Option<String>,
    /// Quantity, always at least 1.
    pub quantity: u32,
    /// Stock limit at the time the item was added.
    #[serde(default)]
    pub stock: Option<u32>,
}

impl CartLineItem {
    /// Create a line from a validated product snapshot.
    pub(crate) fn from_product(product: &CartProduct, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            brand: product.brand.clone(),
            model: product.model.clone(),
            category: product.category.clone(),
            quantity,
            stock: product.stock,
        }
    }

    /// Unit price times quantity, saturating at `i64::MAX`.
    pub fn line_total(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.quantity))
    }

    /// Repair or reject an item read back from storage.
    ///
    /// A quantity above the stock limit is clamped down to the limit;
    /// anything that cannot be repaired is an error.
    pub(crate) fn normalize(mut self) -> Result<Self, CartError> {
        if self.id.is_blank() {
            return Err(CartError::InvalidProduct("missing product id".to_string()));
        }
        if self.price < 0 {
            return Err(CartError::InvalidProduct(format!(
                "negative price {} for {}",
                self.price, self.id
            )));
        }
        if self.quantity == 0 {
            return Err(CartError::InvalidQuantity(format!(
                "zero quantity for {}",
                self.id
            )));
        }
        if let Some(stock) = self.stock {
            if stock == 0 {
                return Err(CartError::StockLimitExceeded {
                    id: self.id.to_string(),
                    requested: self.quantity,
                    available: 0,
                });
            }
            self.quantity = self.quantity.min(stock);
        }
        Ok(self)
    }
}

/// Parse a quantity typed by the shopper.
///
/// Accepts non-negative integers only; `"1.5"`, `"-1"` and `""` are
/// rejected rather than coerced.
pub fn parse_quantity(raw: &str) -> Result<u32, CartError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| CartError::InvalidQuantity(format!("{:?} is not a whole number", trimmed)))
}
