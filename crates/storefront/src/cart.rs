//! Persisted cart store.
//!
//! [`CartStore`] owns the shopper's [`Cart`] and a [`SnapshotStore`]. It is
//! constructed explicitly (no global instance) and handed to whatever needs
//! the cart.
//!
//! # Persistence
//!
//! - [`CartStore::open`] restores the snapshot under
//!   [`CART_STORAGE_KEY`]; a missing or malformed snapshot yields an empty
//!   cart and a warning, never an error.
//! - Every mutation rewrites the full snapshot before returning.
//! - [`CartStore::update`] applies any number of mutations and writes once,
//!   so the stored snapshot only ever reflects a final state.
//!
//! When a write fails the in-memory cart keeps the mutation and the error is
//! returned; [`CartStore::flush`] retries the write.

use catzo_core::{Cart, CartLine, Product, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::storage::{CART_STORAGE_KEY, SnapshotError, SnapshotStore};

/// Errors raised while persisting the cart.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Cart could not be serialized.
    #[error("Failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Snapshot storage rejected the write.
    #[error("Failed to persist cart: {0}")]
    Storage(#[from] SnapshotError),
}

/// The shopper's cart plus its durable snapshot.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
}

impl<S: SnapshotStore> CartStore<S> {
    /// Restore the cart from `storage`, falling back to an empty cart.
    #[must_use]
    pub fn open(storage: S) -> Self {
        let cart = match storage.read(CART_STORAGE_KEY) {
            Ok(Some(snapshot)) => match serde_json::from_str::<Cart>(&snapshot) {
                Ok(cart) => {
                    tracing::debug!(lines = cart.len(), "Cart restored from snapshot");
                    cart
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding malformed cart snapshot");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Cart snapshot unreadable, starting empty");
                Cart::new()
            }
        };

        Self { cart, storage }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn add_item(&mut self, product: Product, quantity: u32) -> Result<(), CartStoreError> {
        self.update(|cart| cart.add_item(product, quantity))
    }

    /// Add a single unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn add_one(&mut self, product: Product) -> Result<(), CartStoreError> {
        self.add_item(product, 1)
    }

    /// Remove the line for `product_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<bool, CartStoreError> {
        self.update(|cart| cart.remove_item(product_id))
    }

    /// Replace a line's quantity; zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<bool, CartStoreError> {
        self.update(|cart| cart.set_quantity(product_id, quantity))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn clear(&mut self) -> Result<(), CartStoreError> {
        self.update(Cart::clear)
    }

    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    /// Apply several mutations and persist the final state once.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written. The mutations
    /// stay applied in memory.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut Cart) -> R) -> Result<R, CartStoreError> {
        let result = f(&mut self.cart);
        self.flush()?;
        Ok(result)
    }

    /// Write the current cart to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    pub fn flush(&self) -> Result<(), CartStoreError> {
        let snapshot = serde_json::to_string(&self.cart)?;
        self.storage.write(CART_STORAGE_KEY, &snapshot)?;
        tracing::debug!(
            lines = self.cart.len(),
            items = self.cart.total_item_count(),
            "Cart persisted"
        );
        Ok(())
    }
}
