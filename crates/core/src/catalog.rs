//! Products and the catalog snapshot used during checkout.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Price, ProductId};

/// A product in the store catalog.
///
/// Read-only from checkout's point of view; only the stock reservation made
/// inside a checkout transaction changes `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: Price,
    /// Units available for sale. Never negative.
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Products keyed by ID, as fetched at the start of one checkout.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<ProductId, Product>,
}

impl Catalog {
    /// Build a catalog from fetched rows. A later duplicate replaces an
    /// earlier one.
    #[must_use]
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.products.contains_key(&id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::from_products(iter)
    }
}
