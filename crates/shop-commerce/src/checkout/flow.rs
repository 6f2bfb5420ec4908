//! Checkout flow.
//!
//! Ties the cart to the pricing calculator and the order, discount and
//! profile services. Discount codes and loyalty points are confirmed by
//! the services before they reach the calculator, which never revalidates
//! them. A flow created with [`CheckoutFlow::signed_in`] is treated as
//! authenticated; otherwise orders go through the guest endpoint.

use shop_cache::KvStore;
use tracing::{debug, info, warn};

use crate::cart::CartStore;
use crate::checkout::{CreatedOrder, OrderRequest, PaymentMethod, ShippingTarget};
use crate::discount::AppliedDiscount;
use crate::pricing::{Adjustments, CheckoutTotals, PricingCalculator};
use crate::services::{DiscountService, OrderService, ProfileService};
use crate::CommerceError;

/// A checkout in progress over a borrowed cart.
pub struct CheckoutFlow<'a, S: KvStore> {
    cart: &'a mut CartStore<S>,
    calculator: PricingCalculator,
    orders: &'a dyn OrderService,
    discounts: &'a dyn DiscountService,
    profile: Option<&'a dyn ProfileService>,
    discount: Option<AppliedDiscount>,
    loyalty_points_used: u64,
    loyalty_points_balance: u64,
}

impl<'a, S: KvStore> CheckoutFlow<'a, S> {
    /// Start a guest checkout.
    pub fn new(
        cart: &'a mut CartStore<S>,
        calculator: PricingCalculator,
        orders: &'a dyn OrderService,
        discounts: &'a dyn DiscountService,
    ) -> Self {
        Self {
            cart,
            calculator,
            orders,
            discounts,
            profile: None,
            discount: None,
            loyalty_points_used: 0,
            loyalty_points_balance: 0,
        }
    }

    /// Attach the signed-in customer's profile service.
    pub fn signed_in(mut self, profile: &'a dyn ProfileService) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Check if the customer is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }

    /// The cart being checked out.
    pub fn cart(&self) -> &CartStore<S> {
        &*self.cart
    }

    /// The applied discount code, if any.
    pub fn discount(&self) -> Option<&AppliedDiscount> {
        self.discount.as_ref()
    }

    /// Points currently set to be redeemed.
    pub fn loyalty_points_used(&self) -> u64 {
        self.loyalty_points_used
    }

    /// Validate `code` against the cart total and apply it.
    ///
    /// Replaces any code applied earlier. A rejected code leaves the
    /// previous one in place.
    pub async fn apply_discount(&mut self, code: &str) -> Result<&AppliedDiscount, CommerceError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CommerceError::InvalidDiscountCode(
                "discount code is empty".to_string(),
            ));
        }
        if self.cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let subtotal = self.cart.total();
        let validation = self.discounts.validate(code, &subtotal).await?;
        if !validation.is_valid {
            debug!(code, "Discount code rejected");
            let reason = validation
                .message
                .unwrap_or_else(|| format!("{code} cannot be used for this order"));
            return Err(CommerceError::InvalidDiscountCode(reason));
        }

        let applied = AppliedDiscount::from_validation(code, &validation, &subtotal);
        debug!(code, savings = applied.savings.amount_minor, "Discount code applied");
        Ok(&*self.discount.insert(applied))
    }

    /// Drop the applied discount code.
    pub fn remove_discount(&mut self) -> Option<AppliedDiscount> {
        self.discount.take()
    }

    /// Redeem `points` loyalty points.
    ///
    /// Signed-in checkouts only. The balance is fetched from the profile
    /// service on every call; zero points clears the redemption.
    pub async fn use_loyalty_points(&mut self, points: u64) -> Result<u64, CommerceError> {
        let Some(profile) = self.profile else {
            return Err(CommerceError::LoginRequired("use loyalty points"));
        };
        if points == 0 {
            self.loyalty_points_used = 0;
            return Ok(0);
        }

        let balance = profile.loyalty_balance().await?;
        if !balance.covers(points) {
            return Err(CommerceError::InsufficientLoyaltyPoints {
                requested: points,
                available: balance.points,
            });
        }

        self.loyalty_points_used = points;
        self.loyalty_points_balance = balance.points;
        debug!(points, balance = balance.points, "Loyalty points applied");
        Ok(points)
    }

    /// Price breakdown for the cart as it stands.
    ///
    /// The discount is recomputed against the current subtotal so that a
    /// cart change after applying a code never over-discounts.
    pub fn totals(&self) -> Result<CheckoutTotals, CommerceError> {
        let subtotal = self.cart.total();
        let discount = self
            .discount
            .as_ref()
            .map_or(0, |applied| applied.savings_for(&subtotal).amount_minor);

        let adjustments = Adjustments::none()
            .with_discount(discount)
            .with_loyalty_points(self.loyalty_points_used, self.loyalty_points_balance);
        self.calculator.calculate(subtotal, &adjustments)
    }

    /// Submit the order.
    ///
    /// On success the cart is cleared along with the applied discount and
    /// points. On failure nothing changes and the error is returned
    /// as-is; submission is not retried.
    pub async fn place_order(
        &mut self,
        shipping: ShippingTarget,
        payment_method: PaymentMethod,
    ) -> Result<CreatedOrder, CommerceError> {
        if self.cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        match &shipping {
            ShippingTarget::ShippingAddress(address) => address.validate()?,
            ShippingTarget::AddressId(_) if !self.is_authenticated() => {
                return Err(CommerceError::LoginRequired("use a saved address"));
            }
            ShippingTarget::AddressId(_) => {}
        }

        let totals = self.totals()?;
        let mut request = OrderRequest::from_cart_items(self.cart.items(), shipping, payment_method)?
            .with_loyalty_points(self.loyalty_points_used);
        if let Some(applied) = &self.discount {
            request = request.with_discount_code(applied.code.clone());
        }

        let submitted = if self.is_authenticated() {
            self.orders.create_order(&request).await
        } else {
            self.orders.create_guest_order(&request).await
        };

        match submitted {
            Ok(order) => {
                info!(
                    order = %order.id,
                    items = request.item_count(),
                    total = totals.grand_total.amount_minor,
                    "Order placed"
                );
                self.cart.clear();
                self.discount = None;
                self.loyalty_points_used = 0;
                self.loyalty_points_balance = 0;
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, "Order submission failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartProduct;
    use crate::checkout::SavedAddress;
    use crate::discount::{DiscountCode, DiscountValidation};
    use crate::ids::AddressId;
    use crate::money::Money;
    use crate::profile::{LoyaltyBalance, UserProfile};
    use async_trait::async_trait;
    use shop_cache::MemoryStore;

    struct Unused;

    #[async_trait(?Send)]
    impl OrderService for Unused {
        async fn create_order(&self, _: &OrderRequest) -> Result<CreatedOrder, CommerceError> {
            Err(CommerceError::service("orders", "unavailable"))
        }

        async fn create_guest_order(&self, _: &OrderRequest) -> Result<CreatedOrder, CommerceError> {
            Err(CommerceError::service("orders", "unavailable"))
        }
    }

    #[async_trait(?Send)]
    impl DiscountService for Unused {
        async fn validate(&self, _: &str, _: &Money) -> Result<DiscountValidation, CommerceError> {
            Ok(DiscountValidation::rejected("no discounts"))
        }

        async fn valid_discounts(&self) -> Result<Vec<DiscountCode>, CommerceError> {
            Ok(Vec::new())
        }
    }

    struct Points(u64);

    #[async_trait(?Send)]
    impl ProfileService for Points {
        async fn current_user(&self) -> Result<UserProfile, CommerceError> {
            Err(CommerceError::service("auth", "unused"))
        }

        async fn addresses(&self) -> Result<Vec<SavedAddress>, CommerceError> {
            Ok(Vec::new())
        }

        async fn loyalty_balance(&self) -> Result<LoyaltyBalance, CommerceError> {
            Ok(LoyaltyBalance { points: self.0 })
        }
    }

    fn cart_with_phone() -> CartStore<MemoryStore> {
        let mut cart = CartStore::load(MemoryStore::new());
        cart.add_quantity(&CartProduct::new("p1", "Phone", 1_000_000), 1).unwrap();
        cart
    }

    #[tokio::test]
    async fn test_guest_cannot_use_points() {
        let mut cart = cart_with_phone();
        let mut flow = CheckoutFlow::new(&mut cart, PricingCalculator::default(), &Unused, &Unused);

        let err = flow.use_loyalty_points(10).await.unwrap_err();
        assert!(matches!(err, CommerceError::LoginRequired(_)));
    }

    #[tokio::test]
    async fn test_points_above_balance_rejected() {
        let mut cart = cart_with_phone();
        let profile = Points(50);
        let mut flow = CheckoutFlow::new(&mut cart, PricingCalculator::default(), &Unused, &Unused)
            .signed_in(&profile);

        let err = flow.use_loyalty_points(51).await.unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InsufficientLoyaltyPoints { requested: 51, available: 50 }
        ));
        assert_eq!(flow.loyalty_points_used(), 0);

        assert_eq!(flow.use_loyalty_points(50).await.unwrap(), 50);
        let totals = flow.totals().unwrap();
        // 1,000,000 + 80,000 tax + 50,000 shipping - 50 * 1,000
        assert_eq!(totals.grand_total.amount_minor, 1_080_000);
    }

    #[tokio::test]
    async fn test_rejected_code() {
        let mut cart = cart_with_phone();
        let mut flow = CheckoutFlow::new(&mut cart, PricingCalculator::default(), &Unused, &Unused);

        let err = flow.apply_discount("NOPE").await.unwrap_err();
        assert!(matches!(err, CommerceError::InvalidDiscountCode(msg) if msg == "no discounts"));
        assert!(flow.discount().is_none());

        let err = flow.apply_discount("   ").await.unwrap_err();
        assert!(matches!(err, CommerceError::InvalidDiscountCode(_)));
    }

    #[tokio::test]
    async fn test_guest_saved_address_rejected() {
        let mut cart = cart_with_phone();
        let mut flow = CheckoutFlow::new(&mut cart, PricingCalculator::default(), &Unused, &Unused);

        let err = flow
            .place_order(ShippingTarget::AddressId(AddressId::new("a1")), PaymentMethod::Cod)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::LoginRequired(_)));
        assert_eq!(flow.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_cart() {
        let mut cart = cart_with_phone();
        {
            let profile = Points(0);
            let mut flow = CheckoutFlow::new(&mut cart, PricingCalculator::default(), &Unused, &Unused)
                .signed_in(&profile);
            let err = flow
                .place_order(ShippingTarget::AddressId(AddressId::new("a1")), PaymentMethod::Cod)
                .await
                .unwrap_err();
            assert!(matches!(err, CommerceError::Service { service: "orders", .. }));
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total().amount_minor, 1_000_000);
    }

    #[tokio::test]
    async fn test_empty_cart_cannot_check_out() {
        let mut cart = CartStore::load(MemoryStore::new());
        let mut flow = CheckoutFlow::new(&mut cart, PricingCalculator::default(), &Unused, &Unused);

        let err = flow
            .place_order(ShippingTarget::AddressId(AddressId::new("a1")), PaymentMethod::Cod)
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));
        assert!(matches!(flow.apply_discount("SAVE10").await, Err(CommerceError::EmptyCart)));
    }
}
