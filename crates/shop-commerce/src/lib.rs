//! Cart, pricing and checkout domain logic for the storefront.
//!
//! This crate owns the client-side state of a shopping session:
//!
//! - **Cart**: line items kept in a [`CartStore`], written through to a
//!   [`shop_cache::KvStore`] after every mutation
//! - **Pricing**: subtotal, tax, shipping, discount and loyalty-point
//!   deductions combined into [`CheckoutTotals`]
//! - **Checkout**: discount validation, loyalty redemption and order
//!   submission through the collaborator [`services`]
//! - **Catalog / profile / addresses**: the data shapes returned by the
//!   backend
//!
//! # Example
//!
//! ```rust
//! use shop_cache::MemoryStore;
//! use shop_commerce::prelude::*;
//!
//! let storage = MemoryStore::new();
//! let mut cart = CartStore::load(&storage);
//!
//! let phone = CartProduct::new("phone-1", "Phone", 6_000_000).with_stock(3);
//! cart.add(&phone).unwrap();
//!
//! let totals = PricingCalculator::default()
//!     .calculate(cart.total(), &Adjustments::none())
//!     .unwrap();
//! assert_eq!(totals.shipping.amount_minor, 0);
//! assert_eq!(totals.grand_total.amount_minor, 6_480_000);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod discount;
pub mod pricing;
pub mod profile;
pub mod services;

pub use error::{CartError, CommerceError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CartError, CommerceError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{parse_quantity, CartLineItem, CartProduct, CartStore, DEFAULT_CART_KEY};

    // Pricing
    pub use crate::pricing::{Adjustments, CheckoutTotals, PricingCalculator, PricingConfig};

    // Discounts
    pub use crate::discount::{AppliedDiscount, DiscountCode, DiscountValidation, DiscountValue};

    // Catalog
    pub use crate::catalog::{Brand, PageInfo, Product, ProductPage, SearchQuery};

    // Checkout
    pub use crate::checkout::{
        CheckoutFlow, CreatedOrder, District, OrderItem, OrderRequest, PaymentMethod, Province,
        SavedAddress, ShippingAddress, ShippingTarget, Ward,
    };

    // Profile
    pub use crate::profile::{LoyaltyBalance, UserProfile};

    // Collaborators
    pub use crate::services::{
        AddressService, CatalogService, DiscountService, OrderService, ProfileService,
    };
}
