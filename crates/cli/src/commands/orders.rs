//! Order history command.

use catzo_core::UserId;
use catzo_storefront::config::StorefrontConfig;
use catzo_storefront::error::Result;
use catzo_storefront::orders::order_history;

/// Print a user's orders, newest first.
///
/// # Errors
///
/// Returns an error if Supabase is not configured or the request fails.
#[allow(clippy::print_stdout)]
pub async fn list(config: &StorefrontConfig, user_id: UserId) -> Result<()> {
    let client = super::supabase(config)?;
    let history = order_history(&client, user_id).await?;

    if history.is_empty() {
        println!("No orders yet");
        return Ok(());
    }

    for summary in history {
        println!(
            "{}  {:<10} {:>12}  placed {}  delivery {}  ({})",
            summary.reference,
            summary.status,
            summary.total,
            summary.placed_on,
            summary.delivery_date,
            summary.payment,
        );
        for item in &summary.items {
            println!("    {item}");
        }
    }
    Ok(())
}
