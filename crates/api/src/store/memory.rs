//! In-memory stores for tests.
//!
//! One [`InMemoryStore`] implements every store trait over shared state.
//! An open transaction holds the state lock until it commits or drops, so
//! transactions are serialized and a rolled-back one leaves no trace.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use ecom_core::{
    Email, NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderItemId, Price, Product,
    ProductId, UserId,
};

use super::{OrderStore, OrderTransaction, ProductStore, UserStore};
use crate::db::RepositoryError;
use crate::models::{NewUser, User};

/// Shared, cloneable in-memory backend.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

#[derive(Clone, Default)]
struct State {
    users: Vec<(User, String)>,
    products: BTreeMap<ProductId, Product>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    next_id: i32,
    faults: Faults,
}

/// Failures to inject into the next operations.
#[derive(Clone, Copy, Default)]
struct Faults {
    product_reads: bool,
    order_write: bool,
    /// Fail the n-th (zero-based) item write of each transaction.
    item_write: Option<usize>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

fn injected(what: &str) -> RepositoryError {
    RepositoryError::Database(sqlx::Error::Protocol(format!("injected {what} failure")))
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with the next free ID.
    ///
    /// # Panics
    ///
    /// Panics if `price_cents` is negative.
    pub async fn add_product(&self, name: &str, price_cents: i64, quantity: i32) -> Product {
        let mut state = self.state.lock().await;
        let id = ProductId::new(state.next_id());
        let price = Price::from_cents(price_cents).expect("test prices are non-negative");
        let product = Product {
            id,
            name: name.to_owned(),
            description: format!("{name} description"),
            image_url: format!("https://cdn.example.com/{id}.png"),
            price,
            quantity,
            created_at: Utc::now(),
        };
        state.products.insert(id, product.clone());
        product
    }

    /// Current committed view of one product.
    pub async fn product(&self, id: ProductId) -> Option<Product> {
        self.state.lock().await.products.get(&id).cloned()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.state.lock().await.orders.clone()
    }

    pub async fn order_items(&self) -> Vec<OrderItem> {
        self.state.lock().await.order_items.clone()
    }

    /// Make every catalog read fail.
    pub async fn fail_product_reads(&self) {
        self.state.lock().await.faults.product_reads = true;
    }

    /// Make order header writes fail.
    pub async fn fail_order_writes(&self) {
        self.state.lock().await.faults.order_write = true;
    }

    /// Make the `index`-th item write of every transaction fail.
    pub async fn fail_item_write(&self, index: usize) {
        self.state.lock().await.faults.item_write = Some(index);
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(user, _)| user.clone()))
    }

    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|(user, _)| &user.email == email)
            .cloned())
    }

    async fn create_with_password(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|(u, _)| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let created = User {
            id: UserId::new(state.next_id()),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            created_at: Utc::now(),
        };
        state.users.push((created.clone(), password_hash.to_owned()));
        Ok(created)
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let state = self.state.lock().await;
        if state.faults.product_reads {
            return Err(injected("product read"));
        }
        Ok(state.products.values().cloned().collect())
    }

    async fn fetch_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let state = self.state.lock().await;
        if state.faults.product_reads {
            return Err(injected("product read"));
        }
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>, RepositoryError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryTransaction {
            guard,
            staged,
            item_writes: 0,
        }))
    }
}

/// Writes go to `staged`; commit copies it over the shared state.
struct InMemoryTransaction {
    guard: OwnedMutexGuard<State>,
    staged: State,
    item_writes: usize,
}

#[async_trait]
impl OrderTransaction for InMemoryTransaction {
    async fn reserve_stock(
        &mut self,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        match self.staged.products.get_mut(&product_id) {
            Some(product) if product.quantity >= quantity => {
                product.quantity -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn create_order(&mut self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        if self.staged.faults.order_write {
            return Err(injected("order write"));
        }

        let id = OrderId::new(self.staged.next_id());
        self.staged.orders.push(Order {
            id,
            user_id: order.user_id,
            total: order.total,
            status: order.status,
            address: order.address.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn create_order_item(
        &mut self,
        item: &NewOrderItem,
    ) -> Result<OrderItemId, RepositoryError> {
        let index = self.item_writes;
        self.item_writes += 1;
        if self.staged.faults.item_write == Some(index) {
            return Err(injected("order item write"));
        }
        if !self.staged.orders.iter().any(|o| o.id == item.order_id) {
            return Err(RepositoryError::NotFound);
        }

        let id = OrderItemId::new(self.staged.next_id());
        self.staged.order_items.push(OrderItem {
            id,
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let Self {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }
}
