//! ecom core - domain types and pure checkout rules.
//!
//! This crate provides the types shared by the ecom components:
//! - `api` - JSON HTTP service (registration, products, checkout)
//! - `cli` - Command-line tools for migrations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. The stock and pricing rules of checkout live here so they
//! can be tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`catalog`] - Products and the per-checkout catalog snapshot
//! - [`order`] - Orders, order items, and their insert payloads
//! - [`checkout`] - Cart lines, stock validation, and pricing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod order;
pub mod types;

pub use catalog::{Catalog, Product};
pub use checkout::{CartError, CartItem, StockError, price_total, product_ids, validate_stock};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use types::*;
