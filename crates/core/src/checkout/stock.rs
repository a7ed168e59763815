//! Stock validation against a catalog snapshot.

use crate::{CartItem, Catalog, ProductId};

/// A requested line that the catalog cannot satisfy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StockError {
    /// Nothing came back from the catalog for a non-empty request.
    #[error("product map is empty")]
    EmptyCatalog,

    #[error("product ID {0} not found")]
    ProductNotFound(ProductId),

    #[error("insufficient stock for product ID {product_id}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i32,
        available: i32,
    },
}

/// Confirm every requested line exists in `catalog` with enough quantity.
///
/// Each line is checked on its own against the snapshot; two lines for the
/// same product are not summed here. The stock reservation made while
/// writing the order catches that case.
///
/// # Errors
///
/// Returns the [`StockError`] for the first failing line, or
/// [`StockError::EmptyCatalog`] when `catalog` is empty and `requested` is not.
pub fn validate_stock(requested: &[CartItem], catalog: &Catalog) -> Result<(), StockError> {
    if catalog.is_empty() && !requested.is_empty() {
        return Err(StockError::EmptyCatalog);
    }

    for item in requested {
        let id = item.product();
        let product = catalog.get(id).ok_or(StockError::ProductNotFound(id))?;
        if product.quantity < item.quantity {
            return Err(StockError::InsufficientStock {
                product_id: id,
                requested: item.quantity,
                available: product.quantity,
            });
        }
    }

    Ok(())
}
