//! Order request and response types.

use crate::cart::CartLineItem;
use crate::checkout::ShippingAddress;
use crate::ids::{AddressId, OrderId, ProductId};
use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    /// Bank transfer.
    BankTransfer,
    /// E-wallet.
    EWallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "COD",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::EWallet => "E_WALLET",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "Cash on delivery",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::EWallet => "E-wallet",
        }
    }
}

/// One product and quantity in an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    /// Product ordered.
    pub product: ProductId,
    /// Units ordered.
    pub quantity: u32,
}

impl From<&CartLineItem> for OrderItem {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product: item.id.clone(),
            quantity: item.quantity,
        }
    }
}

/// Where an order ships: a new address or one saved on the account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ShippingTarget {
    /// Address entered at checkout.
    ShippingAddress(ShippingAddress),
    /// A saved address, signed-in customers only.
    AddressId(AddressId),
}

impl ShippingTarget {
    /// Check if this refers to a saved address.
    pub fn is_saved(&self) -> bool {
        matches!(self, ShippingTarget::AddressId(_))
    }
}

/// Body submitted to the order service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Products and quantities.
    pub items: Vec<OrderItem>,
    /// Delivery address, serialized as `shippingAddress` or `addressId`.
    #[serde(flatten)]
    pub shipping: ShippingTarget,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Applied discount code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    /// Loyalty points redeemed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty_points_used: Option<u64>,
}

impl OrderRequest {
    /// Build a request from cart lines.
    pub fn from_cart_items(
        items: &[CartLineItem],
        shipping: ShippingTarget,
        payment_method: PaymentMethod,
    ) -> Result<Self, CommerceError> {
        if items.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        Ok(Self {
            items: items.iter().map(OrderItem::from).collect(),
            shipping,
            payment_method,
            discount_code: None,
            loyalty_points_used: None,
        })
    }

    /// Attach a discount code.
    pub fn with_discount_code(mut self, code: impl Into<String>) -> Self {
        self.discount_code = Some(code.into());
        self
    }

    /// Redeem loyalty points; zero leaves the field out.
    pub fn with_loyalty_points(mut self, points: u64) -> Self {
        self.loyalty_points_used = (points > 0).then_some(points);
        self
    }

    /// Total units ordered.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// The order service's reply to a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    /// Order identifier.
    #[serde(alias = "_id")]
    pub id: OrderId,
    /// Human-readable order number.
    #[serde(default)]
    pub order_number: Option<String>,
    /// Amount charged, in minor units.
    #[serde(default)]
    pub total: Option<i64>,
    /// Initial order status.
    #[serde(default)]
    pub status: Option<String>,
}
