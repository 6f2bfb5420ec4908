//! End-to-end checkout over an in-memory cart and scripted services.

use std::cell::RefCell;

use async_trait::async_trait;
use shop_cache::MemoryStore;
use shop_commerce::prelude::*;

#[derive(Default)]
struct RecordingOrders {
    fail: bool,
    authenticated: RefCell<Vec<OrderRequest>>,
    guest: RefCell<Vec<OrderRequest>>,
}

#[async_trait(?Send)]
impl OrderService for RecordingOrders {
    async fn create_order(&self, request: &OrderRequest) -> Result<CreatedOrder, CommerceError> {
        if self.fail {
            return Err(CommerceError::service("orders", "HTTP 500"));
        }
        self.authenticated.borrow_mut().push(request.clone());
        Ok(created("o-auth"))
    }

    async fn create_guest_order(&self, request: &OrderRequest) -> Result<CreatedOrder, CommerceError> {
        if self.fail {
            return Err(CommerceError::service("orders", "HTTP 500"));
        }
        self.guest.borrow_mut().push(request.clone());
        Ok(created("o-guest"))
    }
}

fn created(id: &str) -> CreatedOrder {
    CreatedOrder {
        id: OrderId::new(id),
        order_number: None,
        total: None,
        status: None,
    }
}

/// Accepts SAVE10 as 10% off, rejects everything else.
struct TenPercent {
    seen_totals: RefCell<Vec<i64>>,
}

#[async_trait(?Send)]
impl DiscountService for TenPercent {
    async fn validate(&self, code: &str, total: &Money) -> Result<DiscountValidation, CommerceError> {
        self.seen_totals.borrow_mut().push(total.amount_minor);
        let discount = DiscountCode::percentage("SAVE10", 1_000);
        if discount.matches(code) {
            Ok(DiscountValidation::accepted(
                discount.value,
                discount.savings_for(total).amount_minor,
            ))
        } else {
            Ok(DiscountValidation::rejected("Code has expired"))
        }
    }

    async fn valid_discounts(&self) -> Result<Vec<DiscountCode>, CommerceError> {
        Ok(vec![DiscountCode::percentage("SAVE10", 1_000)])
    }
}

struct Customer {
    points: u64,
}

#[async_trait(?Send)]
impl ProfileService for Customer {
    async fn current_user(&self) -> Result<UserProfile, CommerceError> {
        Ok(UserProfile {
            id: UserId::new("u1"),
            name: "Nguyen Van A".to_string(),
            email: "a@example.com".to_string(),
            phone: None,
            loyalty_points: self.points,
        })
    }

    async fn addresses(&self) -> Result<Vec<SavedAddress>, CommerceError> {
        Ok(Vec::new())
    }

    async fn loyalty_balance(&self) -> Result<LoyaltyBalance, CommerceError> {
        Ok(LoyaltyBalance { points: self.points })
    }
}

fn discounts() -> TenPercent {
    TenPercent {
        seen_totals: RefCell::new(Vec::new()),
    }
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Nguyen Van A".to_string(),
        phone: "0900000000".to_string(),
        street: "1 Hang Bai".to_string(),
        ward_code: "00001".to_string(),
        district_code: "001".to_string(),
        province_code: "01".to_string(),
        ..Default::default()
    }
}

fn filled_cart(storage: &MemoryStore) -> CartStore<&MemoryStore> {
    let mut cart = CartStore::load(storage);
    let phone = CartProduct::new("phone-1", "Phone", 3_000_000).with_stock(5);
    let case = CartProduct::new("case-1", "Case", 500_000);
    cart.add_quantity(&phone, 2).unwrap();
    cart.add(&case).unwrap();
    cart
}

#[tokio::test]
async fn test_guest_checkout_clears_cart() {
    let storage = MemoryStore::new();
    let mut cart = filled_cart(&storage);
    let orders = RecordingOrders::default();
    let discounts = discounts();

    let mut flow = CheckoutFlow::new(&mut cart, PricingCalculator::default(), &orders, &discounts);
    flow.apply_discount("save10").await.unwrap();

    let totals = flow.totals().unwrap();
    assert_eq!(totals.subtotal.amount_minor, 6_500_000);
    assert_eq!(totals.discount.amount_minor, 650_000);
    assert!(totals.is_free_shipping());
    // 6,500,000 + 520,000 - 650,000
    assert_eq!(totals.grand_total.amount_minor, 6_370_000);

    let order = flow
        .place_order(ShippingTarget::ShippingAddress(address()), PaymentMethod::Cod)
        .await
        .unwrap();
    assert_eq!(order.id.as_str(), "o-guest");

    assert!(cart.is_empty());
    assert!(CartStore::load(&storage).is_empty());

    let submitted = orders.guest.borrow();
    assert_eq!(submitted.len(), 1);
    assert!(orders.authenticated.borrow().is_empty());
    let request = &submitted[0];
    assert_eq!(request.items.len(), 2);
    assert_eq!(request.items[0].product.as_str(), "phone-1");
    assert_eq!(request.items[0].quantity, 2);
    assert_eq!(request.discount_code.as_deref(), Some("save10"));
    assert_eq!(request.loyalty_points_used, None);
    assert_eq!(*discounts.seen_totals.borrow(), vec![6_500_000]);
}

#[tokio::test]
async fn test_signed_in_checkout_with_points() {
    let storage = MemoryStore::new();
    let mut cart = filled_cart(&storage);
    let orders = RecordingOrders::default();
    let discounts = discounts();
    let customer = Customer { points: 200 };

    let mut flow = CheckoutFlow::new(&mut cart, PricingCalculator::default(), &orders, &discounts)
        .signed_in(&customer);
    flow.use_loyalty_points(100).await.unwrap();

    let totals = flow.totals().unwrap();
    assert_eq!(totals.loyalty_discount.amount_minor, 100_000);
    assert_eq!(totals.grand_total.amount_minor, 6_920_000);

    let order = flow
        .place_order(
            ShippingTarget::AddressId(AddressId::new("addr-1")),
            PaymentMethod::BankTransfer,
        )
        .await
        .unwrap();
    assert_eq!(order.id.as_str(), "o-auth");

    let submitted = orders.authenticated.borrow();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].loyalty_points_used, Some(100));
    assert_eq!(submitted[0].shipping, ShippingTarget::AddressId(AddressId::new("addr-1")));
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_service_failure_leaves_cart_intact() {
    let storage = MemoryStore::new();
    let mut cart = filled_cart(&storage);
    let orders = RecordingOrders {
        fail: true,
        ..Default::default()
    };
    let discounts = discounts();

    let mut flow = CheckoutFlow::new(&mut cart, PricingCalculator::default(), &orders, &discounts);
    flow.apply_discount("SAVE10").await.unwrap();
    let err = flow
        .place_order(ShippingTarget::ShippingAddress(address()), PaymentMethod::Cod)
        .await
        .unwrap_err();

    assert!(matches!(err, CommerceError::Service { service: "orders", .. }));
    assert_eq!(flow.discount().map(|d| d.code.as_str()), Some("SAVE10"));
    assert_eq!(cart.item_count(), 3);
    assert_eq!(CartStore::load(&storage).item_count(), 3);
}

#[tokio::test]
async fn test_rejected_code_keeps_previous_discount() {
    let storage = MemoryStore::new();
    let mut cart = filled_cart(&storage);
    let orders = RecordingOrders::default();
    let discounts = discounts();

    let mut flow = CheckoutFlow::new(&mut cart, PricingCalculator::default(), &orders, &discounts);
    flow.apply_discount("SAVE10").await.unwrap();

    let err = flow.apply_discount("OLDCODE").await.unwrap_err();
    assert!(matches!(err, CommerceError::InvalidDiscountCode(ref msg) if msg == "Code has expired"));
    assert_eq!(flow.discount().map(|d| d.code.as_str()), Some("SAVE10"));

    assert!(flow.remove_discount().is_some());
    assert!(flow.totals().unwrap().discount.is_zero());
}

#[tokio::test]
async fn test_incomplete_address_rejected_before_submission() {
    let storage = MemoryStore::new();
    let mut cart = filled_cart(&storage);
    let orders = RecordingOrders::default();
    let discounts = discounts();

    let mut flow = CheckoutFlow::new(&mut cart, PricingCalculator::default(), &orders, &discounts);
    let incomplete = ShippingAddress {
        street: String::new(),
        ..address()
    };
    let err = flow
        .place_order(ShippingTarget::ShippingAddress(incomplete), PaymentMethod::Cod)
        .await
        .unwrap_err();

    assert!(matches!(err, CommerceError::ValidationError(_)));
    assert!(orders.guest.borrow().is_empty());
    assert_eq!(cart.len(), 2);
}
