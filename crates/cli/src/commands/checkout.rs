//! Checkout command.

use catzo_core::{PaymentMethod, UserId};
use catzo_storefront::checkout::{CheckoutForm, NotificationStatus, place_order};
use catzo_storefront::config::StorefrontConfig;
use catzo_storefront::error::Result;
use catzo_storefront::services::{DisabledNotifier, EmailJsClient};
use chrono::Utc;

/// Place an order for the cart, email a confirmation, and clear the cart.
///
/// Without an EmailJS configuration the order is still placed and the
/// confirmation is reported as not sent.
///
/// # Errors
///
/// Returns an error if the cart is empty, the form is invalid, Supabase is
/// not configured, or the order cannot be stored.
#[allow(clippy::print_stdout)]
pub async fn place(config: &StorefrontConfig, form: &CheckoutForm, user_id: UserId) -> Result<()> {
    let orders = super::supabase(config)?;
    let mut store = super::open_cart(config);

    let placed = match &config.emailjs {
        Some(emailjs) => {
            let notifier = EmailJsClient::new(emailjs.clone(), config.shop.clone())?;
            place_order(&mut store, &orders, &notifier, form, user_id, Utc::now()).await?
        }
        None => place_order(&mut store, &orders, &DisabledNotifier, form, user_id, Utc::now()).await?,
    };

    println!("Order placed: #{}", placed.order.id.short());
    println!("  Order id: {}", placed.order.id);
    println!("  Total:    {}", placed.order.total().display());
    println!("  Payment:  {}", payment_line(placed.order.payment_method));
    println!("  Delivery: {}", placed.delivery_date.format("%d %B %Y"));

    match placed.notification {
        NotificationStatus::Sent => {
            println!("A confirmation email is on its way to {}", placed.order.customer_email);
        }
        NotificationStatus::Failed(reason) => {
            println!("Confirmation email could not be sent ({reason})");
            println!(
                "Questions? Call {} or write to {}",
                config.shop.phone, config.shop.email
            );
        }
    }
    Ok(())
}

fn payment_line(method: PaymentMethod) -> String {
    format!("{} ({})", method.name(), method.description())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_line_includes_description() {
        assert_eq!(
            payment_line(PaymentMethod::Cod),
            "Cash on Delivery (Pay when you receive your order)"
        );
        assert_eq!(
            payment_line(PaymentMethod::Bank),
            "Bank Transfer (Transfer to our bank account)"
        );
    }
}
