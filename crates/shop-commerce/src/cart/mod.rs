//! Shopping cart module.
//!
//! Contains the line item types and the write-through [`CartStore`].

mod line_item;
mod store;

pub use line_item::{parse_quantity, CartLineItem, CartProduct};
pub use store::{CartStore, DEFAULT_CART_KEY};
