//! Unified error handling for storefront front ends.
//!
//! Provides a unified `AppError` type that front ends (the CLI today) turn
//! into a message and an exit status. Library modules keep their own error
//! enums; `AppError` wraps them through `From`.

use thiserror::Error;

use crate::cart::CartStoreError;
use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::orders::OrderError;
use crate::services::NotifyError;
use crate::supabase::SupabaseError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cart snapshot could not be written.
    #[error("Cart error: {0}")]
    Cart(#[from] CartStoreError),

    /// Catalog read failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Order storage failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Notification failed.
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Checkout stopped.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Supabase API operation failed.
    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the user can fix this by changing their input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::BadRequest(_)
                | Self::Config(_)
                | Self::Catalog(CatalogError::NotFound(_))
                | Self::Checkout(CheckoutError::EmptyCart | CheckoutError::Invalid(_))
        )
    }

    /// Process exit status: 2 for user errors, 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.is_user_error() { 2 } else { 1 }
    }

    /// Message safe to show a shopper.
    ///
    /// Backend failures are summarized; the full error belongs in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Supabase(_)
            | Self::Catalog(CatalogError::Backend(_))
            | Self::Order(OrderError::Backend(_)) => "External service error".to_string(),
            Self::Checkout(CheckoutError::Submit(_)) => {
                "Failed to create order. Please try again.".to_string()
            }
            Self::Checkout(CheckoutError::Invalid(errors)) => errors.to_string(),
            Self::Checkout(CheckoutError::EmptyCart) => "Your cart is empty".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
