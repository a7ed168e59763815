//! Cart lines as submitted by the client.

use serde::{Deserialize, Serialize};

use crate::ProductId;

/// One requested line of a checkout.
///
/// Fields are kept as raw integers so that non-positive values survive
/// deserialization and can be reported back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: i32,
    pub quantity: i32,
}

impl CartItem {
    #[must_use]
    pub const fn new(product_id: i32, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    #[must_use]
    pub const fn product(&self) -> ProductId {
        ProductId::new(self.product_id)
    }
}

/// A cart that cannot be checked out as submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("cart must contain at least one item")]
    Empty,

    #[error("quantity for product ID {product_id} must be at least 1 (got {quantity})")]
    InvalidQuantity { product_id: i32, quantity: i32 },

    #[error("invalid product ID: {0}")]
    InvalidProductId(i32),
}

impl CartError {
    /// Shape errors are reported as "Validation failed"; a bad product ID is
    /// reported as "Invalid cart items".
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Empty | Self::InvalidQuantity { .. })
    }
}

/// Check the cart's shape and collect the distinct product IDs to fetch, in
/// first-seen order.
///
/// # Errors
///
/// - [`CartError::Empty`] when `items` is empty.
/// - [`CartError::InvalidQuantity`] for the first line with `quantity < 1`.
/// - [`CartError::InvalidProductId`] for the first line with `product_id <= 0`.
///
/// Shape problems are checked across the whole cart before product IDs.
pub fn product_ids(items: &[CartItem]) -> Result<Vec<ProductId>, CartError> {
    if items.is_empty() {
        return Err(CartError::Empty);
    }
    if let Some(bad) = items.iter().find(|item| item.quantity < 1) {
        return Err(CartError::InvalidQuantity {
            product_id: bad.product_id,
            quantity: bad.quantity,
        });
    }

    let mut ids: Vec<ProductId> = Vec::with_capacity(items.len());
    for item in items {
        let id = item.product();
        if !id.is_positive() {
            return Err(CartError::InvalidProductId(item.product_id));
        }
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_distinct_ids_in_order() {
        let items = [
            CartItem::new(3, 1),
            CartItem::new(1, 2),
            CartItem::new(3, 4),
        ];
        let ids = product_ids(&items).unwrap();
        assert_eq!(ids, vec![ProductId::new(3), ProductId::new(1)]);
    }

    #[test]
    fn test_rejects_non_positive_product_id() {
        assert_eq!(
            product_ids(&[CartItem::new(-1, 1)]),
            Err(CartError::InvalidProductId(-1))
        );
        assert_eq!(
            product_ids(&[CartItem::new(2, 1), CartItem::new(0, 1)]),
            Err(CartError::InvalidProductId(0))
        );
    }

    #[test]
    fn test_rejects_empty_and_bad_quantity() {
        assert_eq!(product_ids(&[]), Err(CartError::Empty));
        let err = product_ids(&[CartItem::new(1, 0)]).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err,
            CartError::InvalidQuantity {
                product_id: 1,
                quantity: 0
            }
        );
    }

    #[test]
    fn test_deserializes_client_payload() {
        let item: CartItem = serde_json::from_str(r#"{"productId": 7, "quantity": 2}"#).unwrap();
        assert_eq!(item, CartItem::new(7, 2));
    }
}
