//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Under /api/v1
//! POST /register               - Create an account
//! POST /login                  - Exchange credentials for a token
//! GET  /products               - Product listing
//! POST /cart/checkout          - Place an order (requires token)
//! ```

pub mod auth;
pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the account routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/products", get(products::index))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new().route("/checkout", post(cart::checkout))
}

/// All versioned API routes, to be nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(product_routes())
        .nest("/cart", cart_routes())
}
