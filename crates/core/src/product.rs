//! Catalog product records.
//!
//! Products are owned by the hosted `products` table; the storefront only
//! reads them. The field names match the table columns so rows decode
//! directly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cats,
    Birds,
    Fish,
    Food,
    Equipment,
    Cages,
    /// Any category value this build does not know about.
    #[serde(other)]
    Other,
}

impl Category {
    /// Browsable categories in display order.
    pub const ALL: [Self; 6] = [
        Self::Cats,
        Self::Birds,
        Self::Fish,
        Self::Food,
        Self::Equipment,
        Self::Cages,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cats => "Cats",
            Self::Birds => "Birds",
            Self::Fish => "Fish",
            Self::Food => "Pet Food",
            Self::Equipment => "Equipment",
            Self::Cages => "Cages",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cats => write!(f, "cats"),
            Self::Birds => write!(f, "birds"),
            Self::Fish => write!(f, "fish"),
            Self::Food => write!(f, "food"),
            Self::Equipment => write!(f, "equipment"),
            Self::Cages => write!(f, "cages"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cats" => Ok(Self::Cats),
            "birds" => Ok(Self::Birds),
            "fish" => Ok(Self::Fish),
            "food" => Ok(Self::Food),
            "equipment" => Ok(Self::Equipment),
            "cages" => Ok(Self::Cages),
            _ => Err(format!("invalid category: {s}")),
        }
    }
}

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    /// Unit price in the shop currency.
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    /// Units on hand. Informational only; the cart does not clamp to it.
    pub stock_quantity: u32,
    /// Age label for live animals (e.g., "3 months").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    /// Days from order to delivery.
    pub delivery_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Unit price paired with the shop currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::inr(self.price)
    }

    /// Whether any stock remains.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ROW: &str = r#"{
        "id": "3f2504e0-4f89-11d3-9a0c-0305e82c3301",
        "name": "Persian Kitten",
        "category": "cats",
        "price": 15000,
        "description": "Fluffy and calm",
        "image_url": "https://cdn.example.com/kitten.jpg",
        "stock_quantity": 2,
        "age": "3 months",
        "delivery_days": 5,
        "created_at": "2024-05-01T10:00:00.123456+00:00"
    }"#;

    #[test]
    fn test_decode_table_row() {
        let product: Product = serde_json::from_str(ROW).unwrap();
        assert_eq!(product.name, "Persian Kitten");
        assert_eq!(product.category, Category::Cats);
        assert_eq!(product.price, Decimal::new(15_000, 0));
        assert_eq!(product.age.as_deref(), Some("3 months"));
        assert!(product.created_at.is_some());
        assert_eq!(product.unit_price().display(), "₹15000.00");
    }

    #[test]
    fn test_decode_fractional_numeric_price() {
        let row = ROW.replace("15000", "249.5");
        let product: Product = serde_json::from_str(&row).unwrap();
        assert_eq!(product.price, Decimal::new(2495, 1));
    }

    #[test]
    fn test_unknown_category_decodes_as_other() {
        let row = ROW.replace("\"cats\"", "\"reptiles\"");
        let product: Product = serde_json::from_str(&row).unwrap();
        assert_eq!(product.category, Category::Other);
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let row = r#"{
            "id": "3f2504e0-4f89-11d3-9a0c-0305e82c3301",
            "name": "Millet Mix",
            "category": "food",
            "price": "120.00",
            "stock_quantity": 0,
            "delivery_days": 2
        }"#;
        let product: Product = serde_json::from_str(row).unwrap();
        assert!(product.age.is_none());
        assert!(product.description.is_empty());
        assert!(!product.in_stock());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("fish".parse::<Category>().unwrap(), Category::Fish);
        assert!("other".parse::<Category>().is_err());
        assert_eq!(Category::Food.name(), "Pet Food");
    }
}
