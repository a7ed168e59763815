//! Pure checkout rules.
//!
//! Checkout runs in this order: [`cart::product_ids`] rejects malformed
//! carts, the caller fetches the products into a [`Catalog`](crate::Catalog),
//! [`validate_stock`] checks availability against that snapshot, and
//! [`price_total`] computes the order total. Everything here is free of I/O;
//! the orchestrator that writes orders lives in the `api` crate.

pub mod cart;
pub mod pricing;
pub mod stock;

pub use cart::{CartError, CartItem, product_ids};
pub use pricing::price_total;
pub use stock::{StockError, validate_stock};
