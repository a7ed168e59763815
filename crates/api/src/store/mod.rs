//! Storage capabilities used by the services.
//!
//! Handlers and services depend on these traits, not on `PgPool`, so that
//! checkout can run against `PostgreSQL` in production and against
//! [`memory::InMemoryStore`] in tests.
//!
//! Order writes go through an [`OrderTransaction`]: nothing it does is
//! visible to other readers until [`OrderTransaction::commit`] succeeds, and
//! dropping it without committing discards every write.

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use async_trait::async_trait;

use ecom_core::{Email, NewOrder, NewOrderItem, OrderId, OrderItemId, Product, ProductId, UserId};

use crate::db::RepositoryError;
use crate::models::{NewUser, User};

/// Account lookup and creation.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// The user and their stored password hash, if the email is registered.
    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Insert a user.
    ///
    /// Returns [`RepositoryError::Conflict`] if the email is already taken.
    async fn create_with_password(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;
}

/// Catalog reads.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Every product, ordered by ID.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// The products whose IDs are in `ids`. Unknown IDs are skipped, so the
    /// result may be shorter than `ids`.
    async fn fetch_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;
}

/// Starts order-writing transactions.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>, RepositoryError>;
}

/// One all-or-nothing unit of order writes.
#[async_trait]
pub trait OrderTransaction: Send {
    /// Take `quantity` units of `product_id` out of stock.
    ///
    /// Returns `false`, changing nothing, when fewer than `quantity` units
    /// remain at this moment.
    async fn reserve_stock(
        &mut self,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError>;

    async fn create_order(&mut self, order: &NewOrder) -> Result<OrderId, RepositoryError>;

    async fn create_order_item(
        &mut self,
        item: &NewOrderItem,
    ) -> Result<OrderItemId, RepositoryError>;

    /// Make every write in this transaction visible.
    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}
