//! Integration tests for the Catzo storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catzo-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Cart behaviour through the store, against memory and file snapshots
//! - `checkout_flow` - Order placement with in-process order and notifier fakes
//!
//! No test talks to a hosted backend; remote collaborators are replaced by
//! the fakes in [`fixtures`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod fixtures;
