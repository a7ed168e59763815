//! Order writes and stock reservation.
//!
//! Every checkout runs inside one `PostgreSQL` transaction: the order header,
//! each stock decrement, and each order line commit together or not at all.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use ecom_core::{NewOrder, NewOrderItem, OrderId, OrderItemId, ProductId};

use super::RepositoryError;
use crate::store::{OrderStore, OrderTransaction};

/// Repository that opens order transactions.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>, RepositoryError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgOrderTransaction { tx }))
    }
}

/// An open order transaction. Rolled back on drop unless committed.
pub struct PgOrderTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderTransaction for PgOrderTransaction {
    async fn reserve_stock(
        &mut self,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        // The row lock taken by UPDATE serializes concurrent reservations of
        // the same product; the second one re-reads the decremented quantity.
        let result = sqlx::query(
            r"
            UPDATE products
            SET quantity = quantity - $2
            WHERE id = $1 AND quantity >= $2
            ",
        )
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn create_order(&mut self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO orders (user_id, total, status, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(order.user_id)
        .bind(order.total)
        .bind(order.status.as_str())
        .bind(&order.address)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(OrderId::new(id))
    }

    async fn create_order_item(
        &mut self,
        item: &NewOrderItem,
    ) -> Result<OrderItemId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO order_items (order_id, product_id, quantity, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(OrderItemId::new(id))
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }
}
