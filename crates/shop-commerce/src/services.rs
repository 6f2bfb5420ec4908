//! Collaborator interfaces.
//!
//! The backend owns products, orders, discounts, addresses and accounts.
//! These traits are what the storefront needs from it; `shop-data`
//! implements them over HTTP and tests substitute fakes. Failures are
//! returned as [`CommerceError::Service`] and are never retried here.
//!
//! Futures are not required to be `Send`: the storefront runs on a
//! single thread.

use async_trait::async_trait;

use crate::catalog::{Brand, Product, ProductPage, SearchQuery};
use crate::checkout::{CreatedOrder, District, OrderRequest, Province, SavedAddress, Ward};
use crate::discount::{DiscountCode, DiscountValidation};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::profile::{LoyaltyBalance, UserProfile};

/// Read-only product catalog.
#[async_trait(?Send)]
pub trait CatalogService {
    /// Products in a category.
    async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, CommerceError>;

    /// A single product.
    async fn product(&self, id: &ProductId) -> Result<Product, CommerceError>;

    /// Brands that have products in a category.
    async fn brands_by_category(&self, category: &str) -> Result<Vec<Brand>, CommerceError>;

    /// Keyword search with pagination.
    async fn search(&self, query: &SearchQuery) -> Result<ProductPage, CommerceError>;
}

/// Order submission.
#[async_trait(?Send)]
pub trait OrderService {
    /// Create an order for the signed-in customer.
    async fn create_order(&self, request: &OrderRequest) -> Result<CreatedOrder, CommerceError>;

    /// Create an order without an account.
    async fn create_guest_order(&self, request: &OrderRequest)
        -> Result<CreatedOrder, CommerceError>;
}

/// Discount code validation.
#[async_trait(?Send)]
pub trait DiscountService {
    /// Check `code` against an order total.
    async fn validate(&self, code: &str, total: &Money)
        -> Result<DiscountValidation, CommerceError>;

    /// Codes currently on offer.
    async fn valid_discounts(&self) -> Result<Vec<DiscountCode>, CommerceError>;
}

/// Administrative divisions for shipping addresses.
#[async_trait(?Send)]
pub trait AddressService {
    /// All provinces.
    async fn provinces(&self) -> Result<Vec<Province>, CommerceError>;

    /// Districts of a province.
    async fn districts(&self, province_code: &str) -> Result<Vec<District>, CommerceError>;

    /// Wards of a district.
    async fn wards(&self, district_code: &str) -> Result<Vec<Ward>, CommerceError>;
}

/// The signed-in customer's account.
#[async_trait(?Send)]
pub trait ProfileService {
    /// Current user.
    async fn current_user(&self) -> Result<UserProfile, CommerceError>;

    /// Saved shipping addresses.
    async fn addresses(&self) -> Result<Vec<SavedAddress>, CommerceError>;

    /// Loyalty points balance.
    async fn loyalty_balance(&self) -> Result<LoyaltyBalance, CommerceError>;
}
