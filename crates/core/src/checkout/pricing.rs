//! Order pricing.

use rust_decimal::Decimal;

use crate::{CartItem, Catalog};

/// Sum `unit price × quantity` over the requested lines.
///
/// Lines whose product is missing from `catalog` contribute nothing. Callers
/// run [`validate_stock`](super::validate_stock) first, which rejects those
/// lines, so a checkout never prices a partial cart.
#[must_use]
pub fn price_total(requested: &[CartItem], catalog: &Catalog) -> Decimal {
    requested
        .iter()
        .filter_map(|item| {
            catalog
                .get(item.product())
                .map(|product| product.price.times(item.quantity))
        })
        .sum()
}
