//! Checkout price calculation.
//!
//! ```text
//! tax         = subtotal * tax_rate
//! shipping    = subtotal > free_shipping_threshold ? 0 : flat_shipping_fee
//! loyalty     = loyalty_points_used * point_value
//! grand_total = subtotal + tax + shipping - discount - loyalty   (never below 0)
//! ```
//!
//! Discount validation and the loyalty balance come from collaborator
//! services; the calculator only combines numbers it is handed.

use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Default tax rate: 8%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;
/// Default free-shipping threshold; subtotals strictly above it ship free.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: i64 = 5_000_000;
/// Default flat shipping fee.
pub const DEFAULT_FLAT_SHIPPING_FEE: i64 = 50_000;
/// Default value of one loyalty point.
pub const DEFAULT_POINT_VALUE: i64 = 1_000;

/// Store-wide pricing parameters. Amounts are in minor units of `currency`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PricingConfig {
    /// Currency all amounts are expressed in.
    pub currency: Currency,
    /// Flat tax rate in basis points.
    pub tax_rate_bps: u32,
    /// Subtotals above this ship free.
    pub free_shipping_threshold: i64,
    /// Shipping fee charged at or below the threshold.
    pub flat_shipping_fee: i64,
    /// Amount one loyalty point is worth.
    pub point_value: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: Currency::VND,
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            flat_shipping_fee: DEFAULT_FLAT_SHIPPING_FEE,
            point_value: DEFAULT_POINT_VALUE,
        }
    }
}

impl PricingConfig {
    /// Reject nonsensical settings.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.free_shipping_threshold < 0 {
            return Err(CommerceError::ValidationError(
                "free_shipping_threshold must not be negative".to_string(),
            ));
        }
        if self.flat_shipping_fee < 0 {
            return Err(CommerceError::ValidationError(
                "flat_shipping_fee must not be negative".to_string(),
            ));
        }
        if self.point_value < 0 {
            return Err(CommerceError::ValidationError(
                "point_value must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Already-validated deductions to apply at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Adjustments {
    /// Discount amount confirmed by the discount service.
    pub discount: i64,
    /// Loyalty points the shopper wants to redeem.
    pub loyalty_points_used: u64,
    /// Points balance reported by the profile service.
    pub loyalty_points_balance: u64,
}

impl Adjustments {
    /// No discount, no points.
    pub fn none() -> Self {
        Self::default()
    }

    /// Apply a discount amount.
    pub fn with_discount(mut self, amount: i64) -> Self {
        self.discount = amount;
        self
    }

    /// Redeem `used` points out of `balance`.
    pub fn with_loyalty_points(mut self, used: u64, balance: u64) -> Self {
        self.loyalty_points_used = used;
        self.loyalty_points_balance = balance;
        self
    }
}

/// Complete price breakdown for a checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutTotals {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Tax on the subtotal.
    pub tax: Money,
    /// Shipping fee.
    pub shipping: Money,
    /// Discount-code deduction.
    pub discount: Money,
    /// Points redeemed.
    pub loyalty_points_used: u64,
    /// Value of the redeemed points.
    pub loyalty_discount: Money,
    /// Amount to charge.
    pub grand_total: Money,
}

impl CheckoutTotals {
    /// Total of discount and loyalty deductions.
    pub fn savings(&self) -> Money {
        Money::new(
            self.discount
                .amount_minor
                .saturating_add(self.loyalty_discount.amount_minor),
            self.subtotal.currency,
        )
    }

    /// Check if any deductions are applied.
    pub fn has_discounts(&self) -> bool {
        self.savings().is_positive()
    }

    /// Check if shipping is free.
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Combines a subtotal with tax, shipping and deductions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingCalculator {
    config: PricingConfig,
}

impl PricingCalculator {
    /// Create a calculator for the given settings.
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// The settings in use.
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Tax on a subtotal.
    pub fn tax(&self, subtotal: Money) -> Result<Money, CommerceError> {
        subtotal
            .basis_points(self.config.tax_rate_bps)
            .ok_or(CommerceError::Overflow)
    }

    /// Shipping fee for a subtotal.
    pub fn shipping(&self, subtotal: Money) -> Money {
        if subtotal.amount_minor > self.config.free_shipping_threshold {
            Money::zero(subtotal.currency)
        } else {
            Money::new(self.config.flat_shipping_fee, subtotal.currency)
        }
    }

    /// How much more the shopper must spend to ship free.
    pub fn remaining_for_free_shipping(&self, subtotal: Money) -> Money {
        let needed = self
            .config
            .free_shipping_threshold
            .saturating_add(1)
            .saturating_sub(subtotal.amount_minor);
        Money::new(needed.max(0), subtotal.currency)
    }

    /// Value of `points` loyalty points.
    pub fn points_value(&self, points: u64) -> Result<Money, CommerceError> {
        let points = i64::try_from(points).map_err(|_| CommerceError::Overflow)?;
        Money::new(self.config.point_value, self.config.currency)
            .try_multiply(points)
            .ok_or(CommerceError::Overflow)
    }

    /// Compute the full breakdown.
    pub fn calculate(
        &self,
        subtotal: Money,
        adjustments: &Adjustments,
    ) -> Result<CheckoutTotals, CommerceError> {
        if subtotal.currency != self.config.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.config.currency.code().to_string(),
                got: subtotal.currency.code().to_string(),
            });
        }
        if subtotal.is_negative() {
            return Err(CommerceError::ValidationError(
                "subtotal must not be negative".to_string(),
            ));
        }
        if adjustments.discount < 0 {
            return Err(CommerceError::ValidationError(
                "discount must not be negative".to_string(),
            ));
        }
        if adjustments.loyalty_points_used > adjustments.loyalty_points_balance {
            return Err(CommerceError::InsufficientLoyaltyPoints {
                requested: adjustments.loyalty_points_used,
                available: adjustments.loyalty_points_balance,
            });
        }

        let currency = subtotal.currency;
        let tax = self.tax(subtotal)?;
        let shipping = self.shipping(subtotal);
        let discount = Money::new(adjustments.discount, currency);
        let loyalty_discount = self.points_value(adjustments.loyalty_points_used)?;

        let gross = subtotal
            .try_add(&tax)
            .and_then(|m| m.try_add(&shipping))
            .ok_or(CommerceError::Overflow)?;
        let net = gross
            .try_subtract(&discount)
            .and_then(|m| m.try_subtract(&loyalty_discount))
            .ok_or(CommerceError::Overflow)?;
        let grand_total = Money::new(net.amount_minor.max(0), currency);

        Ok(CheckoutTotals {
            subtotal,
            tax,
            shipping,
            discount,
            loyalty_points_used: adjustments.loyalty_points_used,
            loyalty_discount,
            grand_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vnd(amount: i64) -> Money {
        Money::new(amount, Currency::VND)
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        let totals = PricingCalculator::default()
            .calculate(vnd(6_000_000), &Adjustments::none())
            .unwrap();

        assert_eq!(totals.shipping.amount_minor, 0);
        assert_eq!(totals.tax.amount_minor, 480_000);
        assert_eq!(totals.grand_total.amount_minor, 6_480_000);
        assert!(totals.is_free_shipping());
        assert!(!totals.has_discounts());
    }

    #[test]
    fn test_shipping_fee_and_discount() {
        let totals = PricingCalculator::default()
            .calculate(vnd(1_000_000), &Adjustments::none().with_discount(100_000))
            .unwrap();

        assert_eq!(totals.shipping.amount_minor, 50_000);
        assert_eq!(totals.tax.amount_minor, 80_000);
        assert_eq!(totals.discount.amount_minor, 100_000);
        assert_eq!(totals.grand_total.amount_minor, 1_030_000);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let calc = PricingCalculator::default();
        assert_eq!(calc.shipping(vnd(5_000_000)).amount_minor, 50_000);
        assert_eq!(calc.shipping(vnd(5_000_001)).amount_minor, 0);
        assert_eq!(calc.remaining_for_free_shipping(vnd(5_000_000)).amount_minor, 1);
        assert_eq!(calc.remaining_for_free_shipping(vnd(6_000_000)).amount_minor, 0);
    }

    #[test]
    fn test_loyalty_points() {
        let totals = PricingCalculator::default()
            .calculate(
                vnd(1_000_000),
                &Adjustments::none().with_loyalty_points(30, 100),
            )
            .unwrap();

        assert_eq!(totals.loyalty_discount.amount_minor, 30_000);
        assert_eq!(totals.grand_total.amount_minor, 1_100_000);
        assert_eq!(totals.savings().amount_minor, 30_000);
    }

    #[test]
    fn test_points_above_balance_rejected() {
        let result = PricingCalculator::default().calculate(
            vnd(1_000_000),
            &Adjustments::none().with_loyalty_points(101, 100),
        );
        assert!(matches!(
            result,
            Err(CommerceError::InsufficientLoyaltyPoints {
                requested: 101,
                available: 100
            })
        ));
    }

    #[test]
    fn test_grand_total_never_negative() {
        let totals = PricingCalculator::default()
            .calculate(vnd(100_000), &Adjustments::none().with_discount(1_000_000))
            .unwrap();
        assert_eq!(totals.grand_total.amount_minor, 0);
    }

    #[test]
    fn test_empty_cart_pays_shipping() {
        let totals = PricingCalculator::default()
            .calculate(vnd(0), &Adjustments::none())
            .unwrap();
        assert_eq!(totals.grand_total.amount_minor, 50_000);
    }

    #[test]
    fn test_currency_mismatch() {
        let result = PricingCalculator::default()
            .calculate(Money::new(100, Currency::USD), &Adjustments::none());
        assert!(matches!(result, Err(CommerceError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_negative_discount_rejected() {
        let result = PricingCalculator::default()
            .calculate(vnd(100), &Adjustments::none().with_discount(-1));
        assert!(matches!(result, Err(CommerceError::ValidationError(_))));
    }

    #[test]
    fn test_custom_config() {
        let calc = PricingCalculator::new(PricingConfig {
            currency: Currency::USD,
            tax_rate_bps: 1_000,
            free_shipping_threshold: 10_000,
            flat_shipping_fee: 599,
            point_value: 1,
        });
        let totals = calc
            .calculate(Money::new(5_000, Currency::USD), &Adjustments::none())
            .unwrap();
        assert_eq!(totals.grand_total.amount_minor, 5_000 + 500 + 599);
    }

    #[test]
    fn test_config_validation() {
        assert!(PricingConfig::default().validate().is_ok());
        let bad = PricingConfig {
            flat_shipping_fee: -1,
            ..PricingConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
