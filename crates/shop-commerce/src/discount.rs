//! Discount code types.

use crate::ids::DiscountId;
use crate::money::Money;
use serde::{Deserialize, Deserializer, Serialize};

/// Value of a discount.
///
/// Serialized as `{"type": "percentage", "value": 1000}`. A bare number is
/// also accepted when decoding and read as a whole percent, so `10` is
/// `Percentage(1_000)`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountValue {
    /// Percentage off, in basis points (1000 = 10%).
    Percentage(u32),
    /// Fixed amount off, in minor units.
    Fixed(i64),
}

#[derive(Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
enum TaggedValue {
    Percentage(u32),
    Fixed(i64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Tagged(TaggedValue),
    Percent(f64),
}

impl<'de> Deserialize<'de> for DiscountValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireValue::deserialize(deserializer)? {
            WireValue::Tagged(TaggedValue::Percentage(bps)) => Ok(DiscountValue::Percentage(bps)),
            WireValue::Tagged(TaggedValue::Fixed(amount)) => Ok(DiscountValue::Fixed(amount)),
            WireValue::Percent(percent) if (0.0..=100.0).contains(&percent) => {
                Ok(DiscountValue::Percentage((percent * 100.0).round() as u32))
            }
            WireValue::Percent(percent) => Err(serde::de::Error::custom(format!(
                "discount percentage out of range: {}",
                percent
            ))),
        }
    }
}

impl DiscountValue {
    /// Calculate the amount saved on a given subtotal.
    ///
    /// The result is never negative and never exceeds the subtotal.
    pub fn savings_for(&self, subtotal: &Money) -> Money {
        let raw = match self {
            DiscountValue::Percentage(bps) => subtotal
                .basis_points((*bps).min(10_000))
                .unwrap_or(*subtotal),
            DiscountValue::Fixed(amount) => Money::new((*amount).max(0), subtotal.currency),
        };
        let capped = raw.min(*subtotal);
        Money::new(capped.amount_minor.max(0), subtotal.currency)
    }
}

/// A discount code as listed by the discount service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCode {
    /// Discount identifier.
    #[serde(default, alias = "_id")]
    pub id: Option<DiscountId>,
    /// Code the shopper types (e.g., "SAVE10").
    pub code: String,
    /// Description for display.
    #[serde(default)]
    pub description: Option<String>,
    /// Value of the discount.
    pub value: DiscountValue,
    /// Uses left; `None` means unlimited.
    #[serde(default)]
    pub remaining_uses: Option<u32>,
}

impl DiscountCode {
    /// Create a percentage discount.
    pub fn percentage(code: impl Into<String>, bps: u32) -> Self {
        Self {
            id: None,
            code: code.into(),
            description: None,
            value: DiscountValue::Percentage(bps),
            remaining_uses: None,
        }
    }

    /// Create a fixed amount discount.
    pub fn fixed(code: impl Into<String>, amount: i64) -> Self {
        Self {
            id: None,
            code: code.into(),
            description: None,
            value: DiscountValue::Fixed(amount),
            remaining_uses: None,
        }
    }

    /// Limit the number of uses.
    pub fn with_remaining_uses(mut self, uses: u32) -> Self {
        self.remaining_uses = Some(uses);
        self
    }

    /// Check if the code still has uses left.
    pub fn is_usable(&self) -> bool {
        self.remaining_uses.map_or(true, |uses| uses > 0)
    }

    /// Calculate the saving on a subtotal; zero when the code is used up.
    pub fn savings_for(&self, subtotal: &Money) -> Money {
        if !self.is_usable() {
            return Money::zero(subtotal.currency);
        }
        self.value.savings_for(subtotal)
    }

    /// Check whether `input` names this code (case-insensitive, trimmed).
    pub fn matches(&self, input: &str) -> bool {
        self.code.eq_ignore_ascii_case(input.trim())
    }
}

/// The discount service's verdict on a code for a given order total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountValidation {
    /// Whether the code can be used.
    pub is_valid: bool,
    /// The discount's value, when the service reports it.
    #[serde(default)]
    pub discount_value: Option<DiscountValue>,
    /// Amount saved on the submitted total, in minor units.
    #[serde(default)]
    pub savings: i64,
    /// Reason given for rejection.
    #[serde(default)]
    pub message: Option<String>,
}

impl DiscountValidation {
    /// Validation result for an accepted code.
    pub fn accepted(value: DiscountValue, savings: i64) -> Self {
        Self {
            is_valid: true,
            discount_value: Some(value),
            savings,
            message: None,
        }
    }

    /// Validation result for a rejected code.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            discount_value: None,
            savings: 0,
            message: Some(message.into()),
        }
    }
}

/// A code accepted for the current checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppliedDiscount {
    /// The code used.
    pub code: String,
    /// The discount's value, if known.
    pub value: Option<DiscountValue>,
    /// Saving reported when the code was validated.
    pub savings: Money,
}

impl AppliedDiscount {
    /// Create from a validation result.
    pub fn from_validation(code: impl Into<String>, validation: &DiscountValidation, subtotal: &Money) -> Self {
        let savings = Money::new(validation.savings.max(0), subtotal.currency).min(*subtotal);
        Self {
            code: code.into(),
            value: validation.discount_value,
            savings,
        }
    }

    /// Saving on a (possibly changed) subtotal.
    ///
    /// Recomputed from the discount value when it is known, otherwise the
    /// validated saving capped at the subtotal.
    pub fn savings_for(&self, subtotal: &Money) -> Money {
        match self.value {
            Some(value) => value.savings_for(subtotal),
            None => Money::new(self.savings.amount_minor, subtotal.currency).min(*subtotal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn vnd(amount: i64) -> Money {
        Money::new(amount, Currency::VND)
    }

    #[test]
    fn test_percentage_discount() {
        let discount = DiscountCode::percentage("SAVE10", 1_000);
        assert_eq!(discount.savings_for(&vnd(1_000_000)).amount_minor, 100_000);
    }

    #[test]
    fn test_fixed_discount_capped() {
        let discount = DiscountCode::fixed("SAVE100K", 100_000);
        assert_eq!(discount.savings_for(&vnd(1_000_000)).amount_minor, 100_000);
        assert_eq!(discount.savings_for(&vnd(40_000)).amount_minor, 40_000);
    }

    #[test]
    fn test_used_up_code_saves_nothing() {
        let discount = DiscountCode::percentage("ONCE", 1_000).with_remaining_uses(0);
        assert!(!discount.is_usable());
        assert!(discount.savings_for(&vnd(1_000_000)).is_zero());
    }

    #[test]
    fn test_code_matching() {
        let discount = DiscountCode::percentage("Save10", 1_000);
        assert!(discount.matches(" SAVE10 "));
        assert!(!discount.matches("SAVE20"));
    }

    #[test]
    fn test_validation_wire_format() {
        let validation: DiscountValidation = serde_json::from_str(
            r#"{"isValid":true,"discountValue":{"type":"percentage","value":1000},"savings":100000}"#,
        )
        .unwrap();
        assert!(validation.is_valid);
        assert_eq!(validation.discount_value, Some(DiscountValue::Percentage(1_000)));
        assert_eq!(validation.savings, 100_000);
    }

    #[test]
    fn test_validation_with_bare_percentage() {
        let validation: DiscountValidation =
            serde_json::from_str(r#"{"isValid":true,"discountValue":10,"savings":100000}"#).unwrap();
        assert_eq!(validation.discount_value, Some(DiscountValue::Percentage(1_000)));

        let value: DiscountValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(value, DiscountValue::Percentage(1_250));
        assert!(serde_json::from_str::<DiscountValue>("150").is_err());
        assert!(serde_json::from_str::<DiscountValue>("-5").is_err());
    }

    #[test]
    fn test_tagged_value_roundtrip() {
        let json = serde_json::to_string(&DiscountValue::Fixed(50_000)).unwrap();
        assert_eq!(json, r#"{"type":"fixed","value":50000}"#);
        assert_eq!(
            serde_json::from_str::<DiscountValue>(&json).unwrap(),
            DiscountValue::Fixed(50_000)
        );
    }

    #[test]
    fn test_applied_discount_tracks_subtotal() {
        let validation = DiscountValidation::accepted(DiscountValue::Percentage(1_000), 100_000);
        let applied = AppliedDiscount::from_validation("SAVE10", &validation, &vnd(1_000_000));
        assert_eq!(applied.savings_for(&vnd(2_000_000)).amount_minor, 200_000);

        let opaque = DiscountValidation {
            discount_value: None,
            ..validation
        };
        let applied = AppliedDiscount::from_validation("SAVE10", &opaque, &vnd(1_000_000));
        assert_eq!(applied.savings_for(&vnd(50_000)).amount_minor, 50_000);
    }
}
