//! Cart commands.
//!
//! The cart lives in `<CATZO_DATA_DIR>/catzo-cart.json`. Every change is
//! written back before the command returns.

use catzo_core::{Price, ProductId};
use catzo_storefront::catalog::ProductCatalog;
use catzo_storefront::config::StorefrontConfig;
use catzo_storefront::error::{AppError, Result};

/// Print the cart lines and totals.
#[allow(clippy::print_stdout)]
pub fn show(config: &StorefrontConfig) {
    let store = super::open_cart(config);

    if store.cart().is_empty() {
        println!("Your cart is empty");
        return;
    }

    for line in store.lines() {
        println!(
            "{}  {:<28} {:>4} x {:>12} = {:>12}",
            line.product.id,
            line.product.name,
            line.quantity,
            line.product.unit_price().display(),
            Price::inr(line.line_total()).display(),
        );
    }
    println!(
        "{} item(s), total {}",
        store.total_item_count(),
        Price::inr(store.total_price()).display()
    );
}

/// Look up `product_id` in the catalog and add `quantity` units.
///
/// # Errors
///
/// Returns an error if the product does not exist, the catalog is
/// unreachable, or the cart cannot be saved.
pub async fn add(config: &StorefrontConfig, product_id: ProductId, quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let client = super::supabase(config)?;
    let product = client.find_product(product_id).await?;

    let mut store = super::open_cart(config);
    let name = product.name.clone();
    store.add_item(product, quantity)?;

    tracing::info!(product = %name, quantity, "Added to cart");
    show(config);
    Ok(())
}

/// Remove a product's line.
///
/// A product that is not in the cart leaves it unchanged.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn remove(config: &StorefrontConfig, product_id: ProductId) -> Result<()> {
    let mut store = super::open_cart(config);
    if store.remove_item(&product_id)? {
        tracing::info!(product_id = %product_id, "Removed from cart");
    } else {
        not_in_cart(product_id);
    }

    show(config);
    Ok(())
}

/// Replace a line's quantity; zero or less removes the line.
///
/// A product that is not in the cart leaves it unchanged, as does setting
/// the quantity a line already has.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn set(config: &StorefrontConfig, product_id: ProductId, quantity: i64) -> Result<()> {
    let mut store = super::open_cart(config);
    if store.cart().line(&product_id).is_none() {
        not_in_cart(product_id);
    } else if store.set_quantity(&product_id, quantity)? {
        tracing::info!(product_id = %product_id, quantity, "Cart quantity updated");
    }

    show(config);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn not_in_cart(product_id: ProductId) {
    tracing::debug!(product_id = %product_id, "Product not in cart, nothing changed");
    println!("{product_id} is not in the cart");
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub fn clear(config: &StorefrontConfig) -> Result<()> {
    let mut store = super::open_cart(config);
    store.clear()?;
    println!("Cart cleared");
    Ok(())
}
