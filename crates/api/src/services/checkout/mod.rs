//! Cart checkout.
//!
//! Turns a submitted cart into a `pending` order:
//!
//! 1. check the cart's shape and collect the distinct product IDs,
//! 2. fetch those products as a catalog snapshot,
//! 3. validate every line against the snapshot,
//! 4. price the cart from the snapshot,
//! 5. in one transaction, write the order header, reserve stock per product
//!    in ascending product ID order, write one order item per line in input
//!    order, and commit.
//!
//! Any failure before the commit leaves the database untouched.

mod error;

pub use error::{CheckoutError, ErrorCategory};

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use ecom_core::{
    CartItem, Catalog, NewOrder, NewOrderItem, OrderId, OrderStatus, ProductId, StockError,
    UserId, price_total, product_ids, validate_stock,
};

use crate::store::{OrderStore, ProductStore};

/// Largest total the `orders.total` column holds.
// 99_999_999_999_999 scale 2 (999_999_999_999.99); `Decimal::new` is not const.
pub const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2);

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// Checkout orchestrator.
pub struct CheckoutService<'a> {
    products: &'a dyn ProductStore,
    orders: &'a dyn OrderStore,
    address: &'a str,
}

impl<'a> CheckoutService<'a> {
    /// `address` is written on every order this service creates.
    #[must_use]
    pub const fn new(
        products: &'a dyn ProductStore,
        orders: &'a dyn OrderStore,
        address: &'a str,
    ) -> Self {
        Self {
            products,
            orders,
            address,
        }
    }

    /// Place an order for `user_id` from `items`.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::Cart` if the cart is empty, has a non-positive
    ///   quantity, or a non-positive product ID. Nothing is fetched.
    /// - `CheckoutError::Catalog` if the products cannot be fetched.
    /// - `CheckoutError::Stock` if a product is unknown or short of stock in
    ///   the snapshot. Nothing is written.
    /// - `CheckoutError::TotalOutOfRange` if the total exceeds
    ///   [`MAX_ORDER_TOTAL`]. Nothing is written.
    /// - `CheckoutError::StockReservation` if stock ran out between the
    ///   snapshot and the write. The transaction is rolled back.
    /// - `CheckoutError::Persistence` if any write or the commit fails. The
    ///   transaction is rolled back.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn checkout(
        &self,
        user_id: UserId,
        items: &[CartItem],
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let ids = product_ids(items)?;

        let products = self
            .products
            .fetch_by_ids(&ids)
            .await
            .map_err(CheckoutError::Catalog)?;
        let catalog = Catalog::from_products(products);

        validate_stock(items, &catalog)?;
        let total = price_total(items, &catalog);

        if total > MAX_ORDER_TOTAL {
            return Err(CheckoutError::TotalOutOfRange(total));
        }

        let mut tx = self.orders.begin().await.map_err(CheckoutError::Persistence)?;

        let order_id = tx
            .create_order(&NewOrder {
                user_id,
                total,
                status: OrderStatus::Pending,
                address: self.address.to_owned(),
            })
            .await
            .map_err(CheckoutError::Persistence)?;

        // Product rows are locked in ascending ID order, one reservation per
        // product. Item writes below keep input order.
        for (product_id, quantity) in reservations(items)? {
            let reserved = tx
                .reserve_stock(product_id, quantity)
                .await
                .map_err(CheckoutError::Persistence)?;
            if !reserved {
                tracing::warn!(%product_id, quantity, "stock ran out during checkout");
                return Err(CheckoutError::StockReservation(product_id));
            }
        }

        for item in items {
            let product_id = item.product();
            let product = catalog
                .get(product_id)
                .ok_or(StockError::ProductNotFound(product_id))?;

            tx.create_order_item(&NewOrderItem {
                order_id,
                product_id,
                quantity: item.quantity,
                price: product.price,
            })
            .await
            .map_err(CheckoutError::Persistence)?;
        }

        tx.commit().await.map_err(CheckoutError::Persistence)?;

        tracing::info!(%order_id, %total, "order placed");
        Ok(CheckoutReceipt {
            order_id,
            total_price: total,
        })
    }
}

/// Requested quantity per product, in ascending product ID order.
fn reservations(items: &[CartItem]) -> Result<BTreeMap<ProductId, i32>, CheckoutError> {
    let mut totals: BTreeMap<ProductId, i32> = BTreeMap::new();
    for item in items {
        let product_id = item.product();
        let entry = totals.entry(product_id).or_insert(0);
        *entry = entry
            .checked_add(item.quantity)
            .ok_or(CheckoutError::StockReservation(product_id))?;
    }
    Ok(totals)
}
