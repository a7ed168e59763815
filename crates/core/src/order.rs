//! Orders and order items.
//!
//! `NewOrder` / `NewOrderItem` are the insert payloads produced by checkout;
//! `Order` / `OrderItem` are the stored rows with their assigned IDs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

/// A stored order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Sum of the line totals at purchase time.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// A stored order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    /// Unit price captured at purchase; later catalog price changes do not
    /// touch it.
    pub price: Price,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an order header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total: Decimal,
    pub status: OrderStatus,
    pub address: String,
}

/// Insert payload for one order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Price,
}

impl NewOrderItem {
    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}
