//! Write-through cart store.

use shop_cache::{Cache, KvStore};
use tracing::{debug, warn};

use crate::cart::{CartLineItem, CartProduct};
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Storage key used when none is given.
pub const DEFAULT_CART_KEY: &str = "cart";

/// The shopper's cart.
///
/// Built once per session around an injected [`KvStore`] and passed by
/// reference to whatever needs it. Every successful mutation is written
/// to the store before the call returns. Storage failures are logged and
/// never fail the mutation: the in-memory cart stays authoritative for
/// the rest of the session.
#[derive(Debug)]
pub struct CartStore<S: KvStore> {
    cache: Cache<S>,
    key: String,
    currency: Currency,
    items: Vec<CartLineItem>,
}

impl<S: KvStore> CartStore<S> {
    /// Rehydrate the cart stored under [`DEFAULT_CART_KEY`].
    pub fn load(store: S) -> Self {
        Self::load_with_key(store, DEFAULT_CART_KEY)
    }

    /// Rehydrate the cart stored under `key`.
    ///
    /// A missing, unreadable or corrupt entry yields an empty cart.
    pub fn load_with_key(store: S, key: impl Into<String>) -> Self {
        let cache = Cache::new(store);
        let key = key.into();
        let items = read_items(&cache, &key);
        debug!(key = %key, items = items.len(), "cart loaded");
        Self {
            cache,
            key,
            currency: Currency::default(),
            items,
        }
    }

    /// Set the currency totals are reported in.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Add one unit of `product`.
    ///
    /// Inserts a new line at quantity 1 or bumps an existing line by 1.
    /// Returns the line's new quantity.
    pub fn add(&mut self, product: &CartProduct) -> Result<u32, CartError> {
        self.add_quantity(product, 1)
    }

    /// Add `quantity` units of `product`.
    ///
    /// When the product is already in the cart, its stock limit is
    /// refreshed from `product` (if `product` carries one) before the
    /// check.
    pub fn add_quantity(&mut self, product: &CartProduct, quantity: u32) -> Result<u32, CartError> {
        product.validate()?;
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(
                "cannot add zero units".to_string(),
            ));
        }

        let new_quantity = match self.items.iter_mut().find(|i| i.id == product.id) {
            Some(existing) => {
                let requested = existing
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| CartError::Overflow(product.id.to_string()))?;
                let stock = product.stock.or(existing.stock);
                check_stock(&product.id, requested, stock)?;

                existing.quantity = requested;
                existing.stock = stock;
                requested
            }
            None => {
                check_stock(&product.id, quantity, product.stock)?;
                self.items.push(CartLineItem::from_product(product, quantity));
                quantity
            }
        };

        debug!(id = %product.id, quantity = new_quantity, "cart item added");
        self.persist();
        Ok(new_quantity)
    }

    /// Remove a line. Returns `false` if the id isn't in the cart.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != id);
        let removed = self.items.len() < len_before;
        if removed {
            debug!(id = %id, "cart item removed");
            self.persist();
        }
        removed
    }

    /// Replace a line's quantity.
    ///
    /// Zero removes the line. A quantity above the stock limit is
    /// rejected and the line keeps its old quantity.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return if self.remove(id) {
                Ok(())
            } else {
                Err(CartError::ItemNotInCart(id.to_string()))
            };
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| CartError::ItemNotInCart(id.to_string()))?;
        check_stock(id, quantity, item.stock)?;

        item.quantity = quantity;
        debug!(id = %id, quantity, "cart quantity set");
        self.persist();
        Ok(())
    }

    /// Empty the cart and erase the persisted entry.
    pub fn clear(&mut self) {
        self.items.clear();
        if let Err(e) = self.cache.delete(&self.key) {
            warn!(key = %self.key, error = %e, "failed to erase persisted cart");
        }
        debug!(key = %self.key, "cart cleared");
    }

    /// Sum of price times quantity over all lines.
    pub fn total(&self) -> Money {
        let amount = self
            .items
            .iter()
            .fold(0_i64, |acc, item| acc.saturating_add(item.line_total()));
        Money::new(amount, self.currency)
    }

    /// Sum of quantities over all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Get a line by product id.
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency totals are reported in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        self.cache.store()
    }

    fn persist(&self) {
        if let Err(e) = self.cache.set(&self.key, &self.items) {
            warn!(key = %self.key, error = %e, "failed to persist cart, keeping it in memory");
        }
    }
}

fn check_stock(id: &ProductId, requested: u32, stock: Option<u32>) -> Result<(), CartError> {
    match stock {
        Some(available) if requested > available => Err(CartError::StockLimitExceeded {
            id: id.to_string(),
            requested,
            available,
        }),
        _ => Ok(()),
    }
}

fn read_items<S: KvStore>(cache: &Cache<S>, key: &str) -> Vec<CartLineItem> {
    let raw = match cache.get::<Vec<serde_json::Value>>(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key = %key, error = %e, "persisted cart unreadable, starting empty");
            return Vec::new();
        }
    };

    let mut items: Vec<CartLineItem> = Vec::with_capacity(raw.len());
    for value in raw {
        let item = serde_json::from_value::<CartLineItem>(value)
            .map_err(|e| CartError::InvalidProduct(e.to_string()))
            .and_then(CartLineItem::normalize);
        match item {
            Ok(item) if items.iter().any(|i| i.id == item.id) => {
                warn!(id = %item.id, "dropping duplicate persisted cart line");
            }
            Ok(item) => items.push(item),
            Err(e) => warn!(key = %key, error = %e, "dropping invalid persisted cart line"),
        }
    }
    items
}
