//! Catzo Storefront library.
//!
//! Everything a presentation layer needs to run the shop: the persisted
//! [`cart::CartStore`], catalog filtering, checkout, order history, and the
//! Supabase and EmailJS clients that back them.
//!
//! # Architecture
//!
//! - The cart store never performs network I/O. It owns a
//!   [`core::Cart`](catzo_core::Cart) and writes a snapshot through an
//!   injected [`storage::SnapshotStore`] after every mutation.
//! - Remote collaborators sit behind traits ([`catalog::ProductCatalog`],
//!   [`orders::OrderRepository`], [`services::OrderNotifier`]) so tests and
//!   alternative backends can substitute them.
//! - [`checkout::place_order`] clears the cart only after the order
//!   submission succeeded.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod orders;
pub mod services;
pub mod storage;
pub mod supabase;
