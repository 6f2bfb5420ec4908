//! Key-value persistence port for the storefront.
//!
//! The cart (and anything else that needs to survive a reload) is stored
//! as a named blob in a [`KvStore`]. Backends:
//!
//! - [`MemoryStore`] - process-local map, used by tests and previews
//! - [`FileStore`] - one file per key under a directory
//! - `SpinStore` - Spin's Key-Value Store (`wasm32` only)
//!
//! [`Cache`] layers JSON serialization on top of any backend.
//!
//! # Example
//!
//! ```rust
//! use shop_cache::{Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//! cache.set("greeting", &vec!["hello", "world"]).unwrap();
//!
//! let value: Option<Vec<String>> = cache.get("greeting").unwrap();
//! assert_eq!(value.unwrap().len(), 2);
//! ```

mod error;
mod file;
mod kv;
mod memory;
#[cfg(target_arch = "wasm32")]
mod spin;
mod store;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::Cache;
pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use spin::SpinStore;
pub use store::KvStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
