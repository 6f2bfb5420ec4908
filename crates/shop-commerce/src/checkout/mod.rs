//! Checkout module.
//!
//! Contains the checkout flow, shipping addresses, and order types.

mod address;
mod flow;
mod order;

pub use address::{District, Province, SavedAddress, ShippingAddress, Ward};
pub use flow::CheckoutFlow;
pub use order::{CreatedOrder, OrderItem, OrderRequest, PaymentMethod, ShippingTarget};
