//! Shared products and in-process collaborator fakes.

use std::sync::{Mutex, PoisonError};

use catzo_core::{Category, NewOrder, Order, OrderId, Product, ProductId, UserId};
use catzo_storefront::catalog::{CatalogError, ProductCatalog};
use catzo_storefront::orders::{OrderError, OrderRepository};
use catzo_storefront::services::{NotifyError, OrderConfirmation, OrderNotifier};
use rust_decimal::Decimal;

/// A catalog product with a whole-rupee price.
#[must_use]
pub fn product(name: &str, category: Category, rupees: i64, delivery_days: u32) -> Product {
    Product {
        id: ProductId::generate(),
        name: name.to_string(),
        category,
        price: Decimal::new(rupees, 0),
        description: format!("{name} from the Catzo shop"),
        image_url: String::new(),
        stock_quantity: 10,
        age: None,
        delivery_days,
        created_at: None,
    }
}

/// Fixed in-memory catalog.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    pub products: Vec<Product>,
}

impl ProductCatalog for MemoryCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }
}

/// Order repository that keeps orders in memory, newest first.
#[derive(Debug, Default)]
pub struct MemoryOrders {
    orders: Mutex<Vec<Order>>,
    offline: bool,
}

impl MemoryOrders {
    /// A repository that refuses every submission.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn stored(&self) -> Vec<Order> {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl OrderRepository for MemoryOrders {
    async fn submit_order(&self, order: &NewOrder) -> Result<Order, OrderError> {
        if self.offline {
            return Err(OrderError::Rejected("backend offline".to_string()));
        }

        let stored = Order {
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
        };

        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(0, stored.clone());
        Ok(stored)
    }

    async fn list_orders(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self
            .stored()
            .into_iter()
            .filter(|order| order.user_id == user_id)
            .collect())
    }
}

/// Notifier that records confirmations, or fails every send.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<OrderConfirmation>>,
    failing: bool,
}

impl RecordingNotifier {
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sent(&self) -> Vec<OrderConfirmation> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl OrderNotifier for RecordingNotifier {
    async fn send_confirmation(&self, confirmation: &OrderConfirmation) -> Result<(), NotifyError> {
        if self.failing {
            return Err(NotifyError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(confirmation.clone());
        Ok(())
    }
}
