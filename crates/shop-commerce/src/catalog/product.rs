//! Product and brand types.

use crate::cart::CartProduct;
use crate::ids::{CategoryId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A product as returned by the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    #[serde(alias = "_id")]
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price in minor currency units.
    pub price: i64,
    /// Price before markdown, if the product is on sale.
    #[serde(default)]
    pub original_price: Option<i64>,
    /// Primary image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Additional image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Brand name.
    #[serde(default)]
    pub brand: Option<String>,
    /// Model name.
    #[serde(default)]
    pub model: Option<String>,
    /// Category key.
    #[serde(default)]
    pub category: Option<CategoryId>,
    /// Units in stock.
    #[serde(default)]
    pub stock: Option<u32>,
    /// Description (may contain HTML/markdown).
    #[serde(default)]
    pub description: Option<String>,
    /// Average review rating (0-5).
    #[serde(default)]
    pub rating: Option<f32>,
    /// Number of reviews.
    #[serde(default)]
    pub num_reviews: u32,
}

impl Product {
    /// Price as money.
    pub fn price(&self, currency: Currency) -> Money {
        Money::new(self.price, currency)
    }

    /// Check if the product can be added to a cart.
    pub fn is_in_stock(&self) -> bool {
        self.stock.map_or(true, |stock| stock > 0)
    }

    /// Check if the product is marked down.
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }

    /// Markdown as a whole percentage of the original price.
    pub fn sale_percent(&self) -> Option<u32> {
        let original = self.original_price.filter(|&o| o > self.price && o > 0)?;
        let off = (original - self.price) * 100 / original;
        u32::try_from(off).ok()
    }

    /// Snapshot for adding to the cart.
    pub fn to_cart_product(&self) -> CartProduct {
        CartProduct {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone().or_else(|| self.images.first().cloned()),
            brand: self.brand.clone(),
            model: self.model.clone(),
            category: self.category.as_ref().map(|c| c.to_string()),
            stock: self.stock,
        }
    }
}

/// A brand listed under a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Brand name.
    pub name: String,
    /// Number of products, when reported.
    #[serde(default)]
    pub product_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_json() -> &'static str {
        r#"{
            "_id": "64f0c1",
            "name": "Galaxy S24",
            "price": 19990000,
            "originalPrice": 22990000,
            "images": ["https://cdn.example.com/s24.jpg"],
            "brand": "Samsung",
            "model": "S24",
            "category": "phones",
            "stock": 7
        }"#
    }

    #[test]
    fn test_deserialize_backend_product() {
        let product: Product = serde_json::from_str(product_json()).unwrap();
        assert_eq!(product.id.as_str(), "64f0c1");
        assert_eq!(product.stock, Some(7));
        assert_eq!(product.num_reviews, 0);
        assert!(product.is_in_stock());
    }

    #[test]
    fn test_sale_percent() {
        let product: Product = serde_json::from_str(product_json()).unwrap();
        assert!(product.is_on_sale());
        assert_eq!(product.sale_percent(), Some(13));
    }

    #[test]
    fn test_to_cart_product() {
        let product: Product = serde_json::from_str(product_json()).unwrap();
        let snapshot = product.to_cart_product();

        assert_eq!(snapshot.id, product.id);
        assert_eq!(snapshot.price, 19_990_000);
        assert_eq!(snapshot.image.as_deref(), Some("https://cdn.example.com/s24.jpg"));
        assert_eq!(snapshot.category.as_deref(), Some("phones"));
        assert_eq!(snapshot.stock, Some(7));
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_out_of_stock() {
        let mut product: Product = serde_json::from_str(product_json()).unwrap();
        product.stock = Some(0);
        assert!(!product.is_in_stock());
    }
}
