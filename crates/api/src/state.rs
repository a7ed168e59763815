//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::db::{OrderRepository, ProductRepository, UserRepository};
use crate::services::auth::JwtKeys;
use crate::store::{OrderStore, ProductStore, UserStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Handlers reach storage only through the
/// store traits; the pool is kept for the readiness probe.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: Option<PgPool>,
    jwt: JwtKeys,
    users: Box<dyn UserStore>,
    products: Box<dyn ProductStore>,
    orders: Box<dyn OrderStore>,
}

impl AppState {
    /// Create state backed by `PostgreSQL`.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        Self::build(
            config,
            Some(pool.clone()),
            Box::new(UserRepository::new(pool.clone())),
            Box::new(ProductRepository::new(pool.clone())),
            Box::new(OrderRepository::new(pool)),
        )
    }

    /// Create state over arbitrary stores, with no database pool.
    #[must_use]
    pub fn with_stores(
        config: ApiConfig,
        users: Box<dyn UserStore>,
        products: Box<dyn ProductStore>,
        orders: Box<dyn OrderStore>,
    ) -> Self {
        Self::build(config, None, users, products, orders)
    }

    fn build(
        config: ApiConfig,
        pool: Option<PgPool>,
        users: Box<dyn UserStore>,
        products: Box<dyn ProductStore>,
        orders: Box<dyn OrderStore>,
    ) -> Self {
        let jwt = JwtKeys::from_config(&config.jwt);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                jwt,
                users,
                products,
                orders,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// The database pool, if this state is backed by `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn jwt(&self) -> &JwtKeys {
        &self.inner.jwt
    }

    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.products.as_ref()
    }

    #[must_use]
    pub fn orders(&self) -> &dyn OrderStore {
        self.inner.orders.as_ref()
    }
}
