//! Order submission and history.

use std::future::Future;

use catzo_core::{NewOrder, Order, UserId};
use thiserror::Error;

use crate::supabase::SupabaseError;

/// Errors that can occur when storing or reading orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The hosted database request failed.
    #[error("Order backend error: {0}")]
    Backend(#[from] SupabaseError),

    /// The order was refused for another reason.
    #[error("Order rejected: {0}")]
    Rejected(String),
}

/// Remote store for placed orders.
pub trait OrderRepository: Sync {
    /// Persist a new order and return the stored row (with its id).
    fn submit_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<Order, OrderError>> + Send;

    /// A user's orders, newest first.
    fn list_orders(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Order>, OrderError>> + Send;
}

/// Display-ready view of a stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    /// `#` plus the first eight characters of the order id.
    pub reference: String,
    pub status: &'static str,
    pub total: String,
    pub payment: &'static str,
    pub delivery_date: String,
    pub placed_on: String,
    pub items: Vec<String>,
}

impl OrderSummary {
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        let placed = order.created_at.unwrap_or(order.order_date);
        Self {
            reference: format!("#{}", order.id.short()),
            status: order.status.label(),
            total: order.total().display(),
            payment: order.payment_method.name(),
            delivery_date: order.delivery_date.clone(),
            placed_on: placed.format("%Y-%m-%d").to_string(),
            items: order
                .items
                .iter()
                .map(|line| format!("{} x {}", line.product.name, line.quantity))
                .collect(),
        }
    }
}

/// Fetch a user's history as display summaries.
///
/// # Errors
///
/// Returns an error if the repository request fails.
pub async fn order_history<R: OrderRepository>(
    repository: &R,
    user_id: UserId,
) -> Result<Vec<OrderSummary>, OrderError> {
    let orders = repository.list_orders(user_id).await?;
    tracing::debug!(user_id = %user_id, count = orders.len(), "Order history loaded");
    Ok(orders.iter().map(OrderSummary::from_order).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catzo_core::{
        CartLine, Category, OrderId, OrderStatus, PaymentMethod, Product, ProductId,
    };
    use rust_decimal::Decimal;

    use super::*;

    fn order(user_id: UserId) -> Order {
        Order {
            id: "9b2d7c1e-0000-4000-8000-000000000001".parse::<OrderId>().unwrap(),
            user_id,
            customer_name: "Ravi".to_string(),
            customer_phone: "9123456780".to_string(),
            customer_email: "ravi@example.com".to_string(),
            customer_address: "4 Hill Street".to_string(),
            items: vec![CartLine {
                product: Product {
                    id: ProductId::generate(),
                    name: "Guppy".to_string(),
                    category: Category::Fish,
                    price: Decimal::new(4_950, 2),
                    description: String::new(),
                    image_url: String::new(),
                    stock_quantity: 20,
                    age: None,
                    delivery_days: 2,
                    created_at: None,
                },
                quantity: 3,
            }],
            total_amount: Decimal::new(14_850, 2),
            payment_method: PaymentMethod::Cod,
            order_date: "2024-05-10T08:00:00Z".parse().unwrap(),
            delivery_date: "2024-05-12".to_string(),
            status: OrderStatus::Shipped,
            created_at: None,
        }
    }

    #[test]
    fn test_summary_fields() {
        let summary = OrderSummary::from_order(&order(UserId::generate()));

        assert_eq!(summary.reference, "#9b2d7c1e");
        assert_eq!(summary.status, "Shipped");
        assert_eq!(summary.total, "₹148.50");
        assert_eq!(summary.placed_on, "2024-05-10");
        assert_eq!(summary.items, ["Guppy x 3"]);
    }

    struct StaticOrders(Vec<Order>);

    impl OrderRepository for StaticOrders {
        async fn submit_order(&self, _order: &NewOrder) -> Result<Order, OrderError> {
            Err(OrderError::Rejected("read-only".to_string()))
        }

        async fn list_orders(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
            Ok(self
                .0
                .iter()
                .filter(|o| o.user_id == user_id)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn test_history_only_contains_user_orders() {
        let me = UserId::generate();
        let repo = StaticOrders(vec![order(me), order(UserId::generate())]);

        let history = order_history(&repo, me).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(order_history(&repo, UserId::generate()).await.unwrap().is_empty());
    }
}
