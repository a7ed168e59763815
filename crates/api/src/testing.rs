//! Helpers for driving the API in tests.

use secrecy::SecretString;

use crate::config::{ApiConfig, DEFAULT_ORDER_ADDRESS, JwtConfig};
use crate::state::AppState;
use crate::store::memory::InMemoryStore;

/// A signing secret that passes the production checks.
pub const TEST_JWT_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6q";

/// Configuration that needs no environment.
#[must_use]
pub fn test_config() -> ApiConfig {
    ApiConfig {
        database_url: SecretString::from("postgres://localhost/ecom_test"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        public_host: "http://localhost".to_string(),
        jwt: JwtConfig {
            secret: SecretString::from(TEST_JWT_SECRET),
            expiration_seconds: 3600,
        },
        order_address: DEFAULT_ORDER_ADDRESS.to_string(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// State whose stores are all `store`.
#[must_use]
pub fn test_state(store: &InMemoryStore) -> AppState {
    AppState::with_stores(
        test_config(),
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(store.clone()),
    )
}
