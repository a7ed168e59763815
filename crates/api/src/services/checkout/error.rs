//! Checkout error types.

use rust_decimal::Decimal;
use thiserror::Error;

use ecom_core::{CartError, ProductId, StockError};

use crate::db::RepositoryError;

/// Who is at fault for a failed checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The cart cannot be satisfied as submitted (client error).
    InvalidInput,
    /// A storage dependency failed (server error).
    Upstream,
}

/// Errors that can occur while checking out a cart.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Stock(#[from] StockError),

    /// Stock for a product was taken by another order after validation.
    #[error("insufficient stock for product ID {0}")]
    StockReservation(ProductId),

    /// The cart is worth more than an order can record.
    #[error("order total {0} exceeds the maximum order total")]
    TotalOutOfRange(Decimal),

    /// The catalog snapshot could not be read.
    #[error("failed to retrieve products: {0}")]
    Catalog(#[source] RepositoryError),

    /// Writing the order failed; nothing was committed.
    #[error("failed to create order: {0}")]
    Persistence(#[source] RepositoryError),
}

impl CheckoutError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Cart(_)
            | Self::Stock(_)
            | Self::StockReservation(_)
            | Self::TotalOutOfRange(_) => ErrorCategory::InvalidInput,
            Self::Catalog(_) | Self::Persistence(_) => ErrorCategory::Upstream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            CheckoutError::from(CartError::InvalidProductId(0)).category(),
            ErrorCategory::InvalidInput
        );
        assert_eq!(
            CheckoutError::from(StockError::EmptyCatalog).category(),
            ErrorCategory::InvalidInput
        );
        assert_eq!(
            CheckoutError::TotalOutOfRange(Decimal::MAX).category(),
            ErrorCategory::InvalidInput
        );
        assert_eq!(
            CheckoutError::Persistence(RepositoryError::NotFound).category(),
            ErrorCategory::Upstream
        );
    }

    #[test]
    fn test_stock_messages_pass_through() {
        let err = CheckoutError::from(StockError::ProductNotFound(ProductId::new(3)));
        assert_eq!(err.to_string(), "product ID 3 not found");
        assert_eq!(
            CheckoutError::StockReservation(ProductId::new(3)).to_string(),
            "insufficient stock for product ID 3"
        );
    }
}
