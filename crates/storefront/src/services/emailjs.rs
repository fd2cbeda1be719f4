//! EmailJS client for order confirmation emails.
//!
//! Sends the confirmation template through the REST endpoint
//! (`POST /api/v1.0/email/send`) using the configured service, template and
//! keys. The template receives the customer, item list, total, expected
//! delivery date, the order id and the shop's contact details.

use std::time::Duration;

use serde::Serialize;
use tracing::instrument;

use super::{NotifyError, OrderConfirmation, OrderNotifier};
use crate::config::{EmailJsConfig, ShopContact, expose};

/// EmailJS send endpoint.
const SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Request body for the send endpoint.
#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    /// Public key; EmailJS calls it `user_id`.
    pub user_id: &'a str,
    #[serde(rename = "accessToken")]
    pub access_token: &'a str,
    pub template_params: TemplateParams,
}

/// Variables available to the confirmation template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub to_name: String,
    pub to_email: String,
    pub customer_phone: String,
    pub order_items: String,
    pub total_amount: String,
    pub delivery_date: String,
    pub order_id: String,
    pub shop_phone: String,
    pub shop_email: String,
}

impl TemplateParams {
    #[must_use]
    pub fn new(confirmation: &OrderConfirmation, shop: &ShopContact) -> Self {
        Self {
            to_name: confirmation.customer_name.clone(),
            to_email: confirmation.customer_email.clone(),
            customer_phone: confirmation.customer_phone.clone(),
            order_items: confirmation.order_items.clone(),
            total_amount: format!("{:.2}", confirmation.total_amount.round_dp(2)),
            delivery_date: confirmation.delivery_date.format("%d %B %Y").to_string(),
            order_id: confirmation.order_id.to_string(),
            shop_phone: shop.phone.clone(),
            shop_email: shop.email.clone(),
        }
    }
}

/// EmailJS API client.
#[derive(Clone)]
pub struct EmailJsClient {
    client: reqwest::Client,
    config: EmailJsConfig,
    shop: ShopContact,
    endpoint: String,
}

impl EmailJsClient {
    /// Create a new EmailJS client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: EmailJsConfig, shop: ShopContact) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            config,
            shop,
            endpoint: SEND_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (self-hosted relay, tests).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build the request body for `confirmation`.
    #[must_use]
    pub fn build_request(&self, confirmation: &OrderConfirmation) -> SendRequest<'_> {
        SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: expose(&self.config.private_key),
            template_params: TemplateParams::new(confirmation, &self.shop),
        }
    }
}

impl OrderNotifier for EmailJsClient {
    #[instrument(skip(self, confirmation), fields(order_id = %confirmation.order_id))]
    async fn send_confirmation(&self, confirmation: &OrderConfirmation) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.build_request(confirmation))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "EmailJS rejected confirmation");
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!("Order confirmation email sent");
        Ok(())
    }
}
