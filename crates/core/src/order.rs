//! Placed orders.
//!
//! Field names follow the hosted `orders` table. Items are stored as the
//! same `{ product, quantity }` objects the cart persists, so an order row
//! carries a full copy of the cart at the moment it was placed.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::types::{Email, OrderId, OrderStatus, PaymentMethod, PhoneNumber, Price, UserId};

/// Validated customer contact and delivery details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: PhoneNumber,
    pub email: Email,
    pub address: String,
    pub payment_method: PaymentMethod,
}

/// Insert payload for a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_phone: PhoneNumber,
    pub customer_email: Email,
    pub customer_address: String,
    pub items: Vec<CartLine>,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub order_date: DateTime<Utc>,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
}

impl NewOrder {
    /// Build a pending order from the cart's current contents.
    #[must_use]
    pub fn from_cart(
        cart: &Cart,
        user_id: UserId,
        customer: CustomerDetails,
        order_date: DateTime<Utc>,
        delivery_date: NaiveDate,
    ) -> Self {
        Self {
            user_id,
            customer_name: customer.name,
            customer_phone: customer.phone,
            customer_email: customer.email,
            customer_address: customer.address,
            items: cart.lines().to_vec(),
            total_amount: cart.total_price(),
            payment_method: customer.payment_method,
            order_date,
            delivery_date,
            status: OrderStatus::Pending,
        }
    }
}

/// An order as stored remotely.
///
/// Contact fields are kept as plain strings: rows written by older clients
/// are not guaranteed to pass today's validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub customer_address: String,
    pub items: Vec<CartLine>,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub order_date: DateTime<Utc>,
    /// Expected delivery date. Older rows stored a locale-formatted string.
    pub delivery_date: String,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Order total paired with the shop currency.
    #[must_use]
    pub fn total(&self) -> Price {
        Price::inr(self.total_amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::product::{Category, Product};
    use crate::types::ProductId;

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Asha".to_string(),
            phone: PhoneNumber::parse("9876543210").unwrap(),
            email: Email::parse("asha@example.com").unwrap(),
            address: "12 Lake Road".to_string(),
            payment_method: PaymentMethod::Online,
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            Product {
                id: ProductId::generate(),
                name: "Budgie".to_string(),
                category: Category::Birds,
                price: Decimal::new(1_200, 0),
                description: String::new(),
                image_url: String::new(),
                stock_quantity: 4,
                age: Some("6 weeks".to_string()),
                delivery_days: 3,
                created_at: None,
            },
            2,
        );
        cart
    }

    #[test]
    fn test_new_order_copies_cart() {
        let cart = cart();
        let order_date = "2024-06-01T09:30:00Z".parse().unwrap();
        let delivery = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();

        let order = NewOrder::from_cart(&cart, UserId::generate(), customer(), order_date, delivery);

        assert_eq!(order.items, cart.lines());
        assert_eq!(order.total_amount, Decimal::new(2_400, 0));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_method, PaymentMethod::Online);
    }

    #[test]
    fn test_new_order_wire_format() {
        let order_date = "2024-06-01T09:30:00Z".parse().unwrap();
        let delivery = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        let order = NewOrder::from_cart(&cart(), UserId::generate(), customer(), order_date, delivery);

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["payment_method"], "online");
        assert_eq!(value["delivery_date"], "2024-06-04");
        assert_eq!(value["customer_phone"], "9876543210");
        assert_eq!(value["items"][0]["quantity"], 2);
    }

    #[test]
    fn test_decode_legacy_order_row() {
        let row = serde_json::json!({
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "user_id": "3f2504e0-4f89-11d3-9a0c-0305e82c3301",
            "customer_name": "Ravi",
            "customer_phone": "98765 43210",
            "customer_email": "ravi@example.com",
            "customer_address": "4 Hill St",
            "items": [],
            "total_amount": 499.5,
            "payment_method": "cod",
            "order_date": "2024-06-01T09:30:00.000Z",
            "delivery_date": "6/4/2024",
            "status": "shipped",
            "created_at": "2024-06-01T09:30:01.5+00:00"
        });

        let order: Order = serde_json::from_value(row).unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.delivery_date, "6/4/2024");
        assert_eq!(order.total().display(), "₹499.50");
        assert_eq!(order.id.short(), "7c9e6679");
    }
}
