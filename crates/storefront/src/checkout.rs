//! Checkout: form validation and order placement.
//!
//! [`place_order`] turns the current cart into a pending order:
//!
//! 1. refuse an empty cart
//! 2. validate the customer form, reporting every failing field
//! 3. submit the order through an [`OrderRepository`]
//! 4. send a confirmation through an [`OrderNotifier`] (best-effort)
//! 5. clear the cart
//!
//! The cart is only touched in step 5, so any failure before the order is
//! stored leaves both the cart and its snapshot exactly as they were.

use std::fmt;

use catzo_core::{
    Cart, CustomerDetails, Email, EmailError, NewOrder, Order, OrderId, PaymentMethod,
    PhoneError, PhoneNumber, UserId,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use thiserror::Error;
use tracing::instrument;

use crate::cart::{CartStore, CartStoreError};
use crate::orders::{OrderError, OrderRepository};
use crate::services::{OrderConfirmation, OrderNotifier};
use crate::storage::SnapshotStore;

/// Errors that stop a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// The customer form has invalid fields.
    #[error("Invalid checkout details: {0}")]
    Invalid(#[from] ValidationErrors),

    /// The order could not be stored; the cart is unchanged.
    #[error("Failed to place order: {0}")]
    Submit(#[from] OrderError),

    /// The order was stored but the emptied cart could not be persisted.
    #[error("Order {order_id} placed but the cart snapshot was not cleared: {source}")]
    ClearFailed {
        order_id: OrderId,
        source: CartStoreError,
    },
}

/// Checkout form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
    Email,
    Address,
}

impl Field {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failing field with the message shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Every failing field of a submitted form, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summarize(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: Field, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn message(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw customer input collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub customer_address: String,
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// Validate every field and return the cleaned customer details.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each failing field.
    pub fn validate(&self) -> Result<CustomerDetails, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.customer_name.trim();
        if name.is_empty() {
            errors.push(Field::Name, "Name is required");
        }

        let phone = match PhoneNumber::parse(&self.customer_phone) {
            Ok(phone) => Some(phone),
            Err(PhoneError::Empty) => {
                errors.push(Field::Phone, "Phone number is required");
                None
            }
            Err(PhoneError::InvalidDigits { .. }) => {
                errors.push(Field::Phone, "Please enter a valid 10-digit phone number");
                None
            }
        };

        let email = match Email::parse(self.customer_email.trim()) {
            Ok(email) => Some(email),
            Err(EmailError::Empty) => {
                errors.push(Field::Email, "Email is required");
                None
            }
            Err(_) => {
                errors.push(Field::Email, "Please enter a valid email address");
                None
            }
        };

        let address = self.customer_address.trim();
        if address.is_empty() {
            errors.push(Field::Address, "Address is required");
        }

        match (phone, email) {
            (Some(phone), Some(email)) if errors.is_empty() => Ok(CustomerDetails {
                name: name.to_string(),
                phone,
                email,
                address: address.to_string(),
                payment_method: self.payment_method,
            }),
            _ => Err(errors),
        }
    }
}

/// Today plus the longest delivery lead time in the cart.
///
/// `None` for an empty cart.
#[must_use]
pub fn expected_delivery_date(cart: &Cart, today: NaiveDate) -> Option<NaiveDate> {
    let days = cart.max_delivery_days()?;
    today.checked_add_days(Days::new(u64::from(days)))
}

/// Whether the confirmation reached the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    Sent,
    Failed(String),
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order: Order,
    pub delivery_date: NaiveDate,
    pub notification: NotificationStatus,
}

/// Place an order for the store's cart and clear it on success.
///
/// `now` stamps the order; its UTC date is the base for the delivery date.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`] / [`CheckoutError::Invalid`] before anything is sent
/// - [`CheckoutError::Submit`] if the repository refuses the order (cart unchanged)
/// - [`CheckoutError::ClearFailed`] if the order exists but the emptied
///   cart could not be written
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn place_order<S, R, N>(
    store: &mut CartStore<S>,
    orders: &R,
    notifier: &N,
    form: &CheckoutForm,
    user_id: UserId,
    now: DateTime<Utc>,
) -> Result<PlacedOrder, CheckoutError>
where
    S: SnapshotStore,
    R: OrderRepository,
    N: OrderNotifier,
{
    let cart = store.cart();
    let Some(delivery_date) = expected_delivery_date(cart, now.date_naive()) else {
        return Err(CheckoutError::EmptyCart);
    };

    let customer = form.validate()?;
    let new_order = NewOrder::from_cart(cart, user_id, customer, now, delivery_date);

    let order = orders.submit_order(&new_order).await.map_err(|e| {
        tracing::error!(error = %e, "Order submission failed, cart kept");
        e
    })?;
    tracing::info!(
        order_id = %order.id,
        total = %order.total_amount,
        items = cart.total_item_count(),
        "Order placed"
    );

    let confirmation = OrderConfirmation::new(&order, cart, delivery_date);
    let notification = match notifier.send_confirmation(&confirmation).await {
        Ok(()) => NotificationStatus::Sent,
        Err(e) => {
            tracing::warn!(order_id = %order.id, error = %e, "Order confirmation not sent");
            NotificationStatus::Failed(e.to_string())
        }
    };

    store.clear().map_err(|source| CheckoutError::ClearFailed {
        order_id: order.id,
        source,
    })?;

    Ok(PlacedOrder {
        order,
        delivery_date,
        notification,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use catzo_core::{Category, OrderStatus, Product, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::services::NotifyError;
    use crate::storage::{CART_STORAGE_KEY, MemorySnapshotStore};

    fn product(name: &str, price: i64, delivery_days: u32) -> Product {
        Product {
            id: ProductId::generate(),
            name: name.to_string(),
            category: Category::Birds,
            price: Decimal::new(price, 0),
            description: String::new(),
            image_url: String::new(),
            stock_quantity: 5,
            age: None,
            delivery_days,
            created_at: None,
        }
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            customer_name: "  Asha ".to_string(),
            customer_phone: "98765 43210".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_address: "12 Lake Road".to_string(),
            payment_method: PaymentMethod::Cod,
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-06-01T09:30:00Z".parse().unwrap()
    }

    #[test]
    fn test_validate_accepts_and_cleans() {
        let details = form().validate().unwrap();
        assert_eq!(details.name, "Asha");
        assert_eq!(details.phone.as_str(), "9876543210");
        assert_eq!(details.payment_method, PaymentMethod::Cod);
    }

    #[test]
    fn test_validate_reports_every_required_field() {
        let errors = CheckoutForm::default().validate().unwrap_err();
        assert_eq!(errors.errors().len(), 4);
        assert_eq!(errors.message(Field::Name), Some("Name is required"));
        assert_eq!(errors.message(Field::Phone), Some("Phone number is required"));
        assert_eq!(errors.message(Field::Email), Some("Email is required"));
        assert_eq!(errors.message(Field::Address), Some("Address is required"));
    }

    #[test]
    fn test_validate_reports_malformed_phone_and_email() {
        let mut form = form();
        form.customer_phone = "12345".to_string();
        form.customer_email = "asha@localhost".to_string();

        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.message(Field::Phone),
            Some("Please enter a valid 10-digit phone number")
        );
        assert_eq!(
            errors.message(Field::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(errors.message(Field::Name), None);
        assert_eq!(
            errors.to_string(),
            "phone: Please enter a valid 10-digit phone number; email: Please enter a valid email address"
        );
    }

    #[test]
    fn test_expected_delivery_uses_longest_lead_time() {
        let mut cart = Cart::new();
        let today = NaiveDate::from_ymd_opt(2024, 6, 29).unwrap();
        assert_eq!(expected_delivery_date(&cart, today), None);

        cart.add_item(product("Seed mix", 200, 2), 1);
        cart.add_item(product("Cockatiel", 5_000, 5), 1);
        assert_eq!(
            expected_delivery_date(&cart, today),
            NaiveDate::from_ymd_opt(2024, 7, 4)
        );
    }

    #[derive(Default)]
    struct RecordingOrders {
        submitted: Mutex<Vec<NewOrder>>,
        reject: bool,
    }

    impl OrderRepository for RecordingOrders {
        async fn submit_order(&self, order: &NewOrder) -> Result<Order, OrderError> {
            if self.reject {
                return Err(OrderError::Rejected("database offline".to_string()));
            }
            self.submitted.lock().unwrap().push(order.clone());
            Ok(Order {
                id: OrderId::generate(),
                user_id: order.user_id,
                customer_name: order.customer_name.clone(),
                customer_phone: order.customer_phone.as_str().to_string(),
                customer_email: order.customer_email.as_str().to_string(),
                customer_address: order.customer_address.clone(),
                items: order.items.clone(),
                total_amount: order.total_amount,
                payment_method: order.payment_method,
                order_date: order.order_date,
                delivery_date: order.delivery_date.to_string(),
                status: order.status,
                created_at: Some(order.order_date),
            })
        }

        async fn list_orders(&self, _user_id: UserId) -> Result<Vec<Order>, OrderError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<OrderConfirmation>>,
        fail: bool,
    }

    impl OrderNotifier for RecordingNotifier {
        async fn send_confirmation(
            &self,
            confirmation: &OrderConfirmation,
        ) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Rejected("quota exceeded".to_string()));
            }
            self.sent.lock().unwrap().push(confirmation.clone());
            Ok(())
        }
    }

    fn stocked_store() -> (CartStore<MemorySnapshotStore>, MemorySnapshotStore) {
        let storage = MemorySnapshotStore::new();
        let mut store = CartStore::open(storage.clone());
        store.add_item(product("Lovebird", 1_500, 3), 2).unwrap();
        store.add_item(product("Perch", 250, 1), 1).unwrap();
        (store, storage)
    }

    #[tokio::test]
    async fn test_place_order_submits_notifies_and_clears() {
        let (mut store, storage) = stocked_store();
        let orders = RecordingOrders::default();
        let notifier = RecordingNotifier::default();
        let user = UserId::generate();

        let placed = place_order(&mut store, &orders, &notifier, &form(), user, now())
            .await
            .unwrap();

        assert_eq!(placed.notification, NotificationStatus::Sent);
        assert_eq!(placed.delivery_date, NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());

        let submitted = orders.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].total_amount, Decimal::new(3_250, 0));
        assert_eq!(submitted[0].status, OrderStatus::Pending);
        assert_eq!(submitted[0].user_id, user);
        assert_eq!(submitted[0].items.len(), 2);

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent[0].order_id, placed.order.id);
        assert_eq!(
            sent[0].order_items,
            "Lovebird x 2 - ₹3000.00\nPerch x 1 - ₹250.00"
        );

        assert!(store.cart().is_empty());
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_empty_cart_is_refused() {
        let mut store = CartStore::open(MemorySnapshotStore::new());
        let result = place_order(
            &mut store,
            &RecordingOrders::default(),
            &RecordingNotifier::default(),
            &form(),
            UserId::generate(),
            now(),
        )
        .await;
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let (mut store, storage) = stocked_store();
        let orders = RecordingOrders::default();
        let writes = storage.write_count();

        let result = place_order(
            &mut store,
            &orders,
            &RecordingNotifier::default(),
            &CheckoutForm::default(),
            UserId::generate(),
            now(),
        )
        .await;

        assert!(matches!(result, Err(CheckoutError::Invalid(_))));
        assert!(orders.submitted.lock().unwrap().is_empty());
        assert_eq!(store.total_item_count(), 3);
        assert_eq!(storage.write_count(), writes);
    }

    #[tokio::test]
    async fn test_rejected_submission_keeps_cart() {
        let (mut store, storage) = stocked_store();
        let before = storage.get(CART_STORAGE_KEY).unwrap();
        let orders = RecordingOrders {
            reject: true,
            ..RecordingOrders::default()
        };

        let result = place_order(
            &mut store,
            &orders,
            &RecordingNotifier::default(),
            &form(),
            UserId::generate(),
            now(),
        )
        .await;

        assert!(matches!(result, Err(CheckoutError::Submit(_))));
        assert_eq!(store.total_item_count(), 3);
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap(), before);
    }

    #[tokio::test]
    async fn test_failed_notification_still_clears_cart() {
        let (mut store, _storage) = stocked_store();
        let notifier = RecordingNotifier {
            fail: true,
            ..RecordingNotifier::default()
        };

        let placed = place_order(
            &mut store,
            &RecordingOrders::default(),
            &notifier,
            &form(),
            UserId::generate(),
            now(),
        )
        .await
        .unwrap();

        assert!(matches!(placed.notification, NotificationStatus::Failed(_)));
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_clear_failure_reports_order_id() {
        let (mut store, storage) = stocked_store();
        storage.fail_writes(true);

        let err = place_order(
            &mut store,
            &RecordingOrders::default(),
            &RecordingNotifier::default(),
            &form(),
            UserId::generate(),
            now(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckoutError::ClearFailed { .. }));
        assert!(store.cart().is_empty());
    }
}
