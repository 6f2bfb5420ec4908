//! Commerce error types.

use thiserror::Error;

/// A cart mutation that was rejected.
///
/// The cart is left unchanged, in memory and in storage, whenever one of
/// these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Product input failed validation (empty id, negative price, ...).
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// Quantity is not a usable non-negative integer.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Requested quantity is above the stock limit.
    #[error("Insufficient stock for {id}: requested {requested}, available {available}")]
    StockLimitExceeded {
        id: String,
        requested: u32,
        available: u32,
    },

    /// Quantity arithmetic overflowed.
    #[error("Quantity overflow for {0}")]
    Overflow(String),
}

/// Errors that can occur in checkout and collaborator operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// A cart mutation was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout attempted with no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Discount code rejected by the discount service.
    #[error("Invalid discount code: {0}")]
    InvalidDiscountCode(String),

    /// More loyalty points requested than the customer holds.
    #[error("Insufficient loyalty points: requested {requested}, available {available}")]
    InsufficientLoyaltyPoints { requested: u64, available: u64 },

    /// Operation needs a signed-in customer.
    #[error("Login required to {0}")]
    LoginRequired(&'static str),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// A collaborator call failed. Not retried.
    #[error("{service} service error: {message}")]
    Service {
        service: &'static str,
        message: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl CommerceError {
    /// Build a collaborator failure.
    pub fn service(service: &'static str, message: impl Into<String>) -> Self {
        CommerceError::Service {
            service,
            message: message.into(),
        }
    }

    /// Message suitable for showing to the shopper.
    pub fn user_message(&self) -> String {
        match self {
            CommerceError::Service { .. } => {
                "Something went wrong talking to the store. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_converts() {
        let err: CommerceError = CartError::ItemNotInCart("p1".into()).into();
        assert_eq!(err.to_string(), "Item not in cart: p1");
    }

    #[test]
    fn test_service_error_hides_details_from_shopper() {
        let err = CommerceError::service("order", "HTTP 502: bad gateway");
        assert_eq!(err.to_string(), "order service error: HTTP 502: bad gateway");
        assert!(!err.user_message().contains("502"));
    }
}
