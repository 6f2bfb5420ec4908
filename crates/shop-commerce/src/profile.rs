//! Signed-in customer data.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// The current user as returned by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier.
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Loyalty points held.
    #[serde(default)]
    pub loyalty_points: u64,
}

/// Loyalty points balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LoyaltyBalance {
    /// Points available to redeem.
    pub points: u64,
}

impl LoyaltyBalance {
    /// Check whether `points` can be redeemed.
    pub fn covers(&self, points: u64) -> bool {
        points <= self.points
    }
}
