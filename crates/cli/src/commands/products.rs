//! Catalog listing.

use catzo_core::Category;
use catzo_storefront::catalog::{CatalogFilter, ProductCatalog};
use catzo_storefront::config::StorefrontConfig;
use catzo_storefront::error::Result;

/// Print products matching the filter, newest first.
///
/// # Errors
///
/// Returns an error if Supabase is not configured or the request fails.
#[allow(clippy::print_stdout)]
pub async fn list(
    config: &StorefrontConfig,
    category: Option<Category>,
    search: Option<String>,
) -> Result<()> {
    let client = super::supabase(config)?;
    let products = client.list_products().await?;
    let filter = CatalogFilter::new(category, search);
    let matching = filter.apply(&products);

    tracing::info!(
        total = products.len(),
        shown = matching.len(),
        "Catalog loaded"
    );

    if matching.is_empty() {
        println!("No products found");
        println!("Categories: {}", category_list());
        return Ok(());
    }

    for product in matching {
        let stock = if product.in_stock() {
            format!("{} in stock", product.stock_quantity)
        } else {
            "out of stock".to_string()
        };
        println!(
            "{}  {:<28} {:<10} {:>12}  {}, delivery {}d",
            product.id,
            product.name,
            product.category.name(),
            product.unit_price().display(),
            stock,
            product.delivery_days,
        );
    }
    Ok(())
}

/// Browsable category keys accepted by `--category`, in display order.
fn category_list() -> String {
    Category::ALL
        .iter()
        .map(|category| format!("{category} ({})", category.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_list_covers_browsable_categories() {
        let list = category_list();
        assert!(list.starts_with("cats (Cats), birds (Birds)"));
        assert!(list.contains("food (Pet Food)"));
        assert!(list.ends_with("cages (Cages)"));
        assert!(!list.contains("other"));
    }
}
