//! Catalog module.
//!
//! Contains the product, brand and search shapes returned by the catalog
//! service.

mod product;
mod search;

pub use product::{Brand, Product};
pub use search::{PageInfo, ProductPage, SearchQuery, DEFAULT_PER_PAGE, MAX_PER_PAGE};
