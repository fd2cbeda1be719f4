//! Catzo Core - Shared types library.
//!
//! This crate provides the types used across all Catzo components:
//! - `storefront` - Cart store, checkout, and remote collaborators
//! - `cli` - Command-line storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no storage. The [`Cart`] container lives here so its invariants
//! can be tested without any persistence adapter.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, phones, and statuses
//! - [`product`] - Catalog records
//! - [`cart`] - The line-item container and its aggregates
//! - [`order`] - Placed orders and order insert payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod order;
pub mod product;
pub mod types;

pub use cart::{Cart, CartLine, InvalidCart};
pub use order::{CustomerDetails, NewOrder, Order};
pub use product::{Category, Product};
pub use types::*;
