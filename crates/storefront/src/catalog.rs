//! Product catalog access and browsing filters.

use std::future::Future;

use catzo_core::{Category, Product, ProductId};
use thiserror::Error;

use crate::supabase::SupabaseError;

/// Errors that can occur when reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with this id exists.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The hosted database request failed.
    #[error("Catalog backend error: {0}")]
    Backend(#[from] SupabaseError),
}

/// Read-only source of catalog products.
pub trait ProductCatalog: Sync {
    /// List every product, newest first.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Look up a single product.
    ///
    /// The default implementation scans [`ProductCatalog::list_products`].
    fn find_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send {
        async move {
            self.list_products()
                .await?
                .into_iter()
                .find(|product| product.id == id)
                .ok_or(CatalogError::NotFound(id))
        }
    }
}

/// Browsing filter: optional category plus free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: Option<Category>,
    pub search: Option<String>,
}

impl CatalogFilter {
    #[must_use]
    pub fn new(category: Option<Category>, search: Option<String>) -> Self {
        Self { category, search }
    }

    /// Whether `product` passes the filter.
    ///
    /// Search is a case-insensitive substring match on name or description.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.category.is_some_and(|category| product.category != category) {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
            }
        }
    }

    /// Products that pass the filter, original order kept.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(name: &str, category: Category, description: &str) -> Product {
        Product {
            id: ProductId::generate(),
            name: name.to_string(),
            category,
            price: Decimal::new(100, 0),
            description: description.to_string(),
            image_url: String::new(),
            stock_quantity: 1,
            age: None,
            delivery_days: 1,
            created_at: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("Persian Kitten", Category::Cats, "Calm indoor companion"),
            product("Goldfish", Category::Fish, "Hardy and bright"),
            product("Cat Tree", Category::Equipment, "Sisal posts for kittens"),
            product("Budgie Cage", Category::Cages, "Fits two birds"),
        ]
    }

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let products = catalog();
        assert_eq!(CatalogFilter::default().apply(&products).len(), 4);
    }

    #[test]
    fn test_category_filter() {
        let products = catalog();
        let filter = CatalogFilter::new(Some(Category::Fish), None);
        assert_eq!(names(&filter.apply(&products)), ["Goldfish"]);
    }

    #[test]
    fn test_search_matches_name_or_description_case_insensitively() {
        let products = catalog();
        let filter = CatalogFilter::new(None, Some("KITTEN".to_string()));
        assert_eq!(names(&filter.apply(&products)), ["Persian Kitten", "Cat Tree"]);
    }

    #[test]
    fn test_category_and_search_combine() {
        let products = catalog();
        let filter = CatalogFilter::new(Some(Category::Equipment), Some("kitten".to_string()));
        assert_eq!(names(&filter.apply(&products)), ["Cat Tree"]);
    }

    #[test]
    fn test_blank_search_matches_all() {
        let products = catalog();
        let filter = CatalogFilter::new(None, Some("   ".to_string()));
        assert_eq!(filter.apply(&products).len(), 4);
    }

    struct FixedCatalog(Vec<Product>);

    impl ProductCatalog for FixedCatalog {
        async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_find_product_default_scans_list() {
        let products = catalog();
        let wanted = products[1].id;
        let source = FixedCatalog(products);

        assert_eq!(source.find_product(wanted).await.unwrap().name, "Goldfish");

        let missing = ProductId::generate();
        assert!(matches!(
            source.find_product(missing).await,
            Err(CatalogError::NotFound(id)) if id == missing
        ));
    }
}
