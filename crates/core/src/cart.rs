//! The shopping cart container.
//!
//! [`Cart`] is an ordered list of [`CartLine`]s with two invariants:
//!
//! - at most one line per product id
//! - every line has a quantity of at least 1
//!
//! Every mutation keeps both, and deserialization rejects input that breaks
//! either one. Aggregates are recomputed from the lines on each call.
//!
//! The wire form is a bare JSON array of `{ "product": …, "quantity": … }`
//! objects, which is also the persisted snapshot format.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::product::Product;
use crate::types::{Price, ProductId};

/// A snapshot that violates the cart invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCart {
    /// Two lines refer to the same product.
    #[error("duplicate line for product {0}")]
    DuplicateProduct(ProductId),
    /// A line has a quantity of zero.
    #[error("line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),
}

/// One product in the cart and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// `unit price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Ordered collection of cart lines, insertion order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` units of `product`.
    ///
    /// Increments the existing line for `product.id` or appends a new one.
    /// Stock is not checked here. Adding zero units does nothing.
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine { product, quantity });
        }
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: Product) {
        self.add_item(product, 1);
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != *product_id);
        self.lines.len() != before
    }

    /// Replace the quantity of an existing line.
    ///
    /// A quantity of zero or less removes the line. Products not in the cart
    /// are ignored. Returns whether the cart changed.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.line_mut(product_id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `unit price × quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == *product_id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Longest delivery lead time among the lines, `None` when empty.
    #[must_use]
    pub fn max_delivery_days(&self) -> Option<u32> {
        self.lines.iter().map(|line| line.product.delivery_days).max()
    }

    /// Plain-text item list for order confirmations.
    ///
    /// One `"{name} x {quantity} - ₹{line total}"` entry per line.
    #[must_use]
    pub fn order_items_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                format!(
                    "{} x {} - {}",
                    line.product.name,
                    line.quantity,
                    Price::inr(line.line_total())
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id == *product_id)
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = InvalidCart;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::with_capacity(lines.len());
        for line in &lines {
            if line.quantity == 0 {
                return Err(InvalidCart::ZeroQuantity(line.product.id));
            }
            if !seen.insert(line.product.id) {
                return Err(InvalidCart::DuplicateProduct(line.product.id));
            }
        }
        Ok(Self { lines })
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.lines.serialize(serializer)
    }
}
