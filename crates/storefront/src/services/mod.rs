//! Outbound services used after an order is placed.
//!
//! # Services
//!
//! - `emailjs` - Order confirmation emails via the EmailJS REST API
//!
//! Notifiers are best-effort: checkout reports a failed notification but
//! never rolls back an order because of one.

pub mod emailjs;

use std::future::Future;

use catzo_core::{Cart, Order, OrderId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

pub use emailjs::EmailJsClient;

/// Errors that can occur when sending a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Notification refused for another reason.
    #[error("Notification rejected: {0}")]
    Rejected(String),
}

/// Everything a confirmation message needs about a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// One line per cart line, see [`Cart::order_items_text`].
    pub order_items: String,
    pub total_amount: Decimal,
    pub delivery_date: NaiveDate,
}

impl OrderConfirmation {
    /// Build a confirmation from the stored order and the cart it came from.
    #[must_use]
    pub fn new(order: &Order, cart: &Cart, delivery_date: NaiveDate) -> Self {
        Self {
            order_id: order.id,
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            customer_phone: order.customer_phone.clone(),
            order_items: cart.order_items_text(),
            total_amount: order.total_amount,
            delivery_date,
        }
    }
}

/// Sends order confirmations to customers.
pub trait OrderNotifier: Sync {
    fn send_confirmation(
        &self,
        confirmation: &OrderConfirmation,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Notifier used when no email service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

impl OrderNotifier for DisabledNotifier {
    async fn send_confirmation(&self, confirmation: &OrderConfirmation) -> Result<(), NotifyError> {
        tracing::warn!(
            order_id = %confirmation.order_id,
            "Email service not configured, skipping order confirmation"
        );
        Err(NotifyError::Rejected(
            "email service not configured".to_string(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_notifier_reports_failure() {
        let confirmation = OrderConfirmation {
            order_id: OrderId::generate(),
            customer_name: "Meera".to_string(),
            customer_email: "meera@example.com".to_string(),
            customer_phone: "9000000001".to_string(),
            order_items: "Canary x 1 - ₹900.00".to_string(),
            total_amount: Decimal::new(900, 0),
            delivery_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        };

        let err = DisabledNotifier
            .send_confirmation(&confirmation)
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Rejected(_)));
    }
}
