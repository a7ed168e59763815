//! Integration tests for ecom.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (router + in-memory stores, no database)
//! cargo test -p ecom-integration-tests
//!
//! # Live tests against a running server and migrated database
//! ECOM_BASE_URL=http://localhost:8080 cargo test -p ecom-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth_api` - Registration and login
//! - `products_api` - Product listing
//! - `checkout_api` - Cart checkout, auth, and error mapping
//! - `live_server` - End-to-end against a real deployment (ignored by default)

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use ecom_api::store::memory::InMemoryStore;
use ecom_api::testing::test_state;

/// A router over a fresh in-memory store.
pub struct TestApp {
    pub store: InMemoryStore,
    router: Router,
}

/// Status and parsed JSON body (`Value::Null` for an empty or non-JSON body).
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let router = ecom_api::app(test_state(&store));
        Self { store, router }
    }

    /// Send `request` through the router.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(request("GET", uri, None, Body::empty())).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value, token: Option<&str>) -> TestResponse {
        self.send(request("POST", uri, token, Body::from(body.to_string())))
            .await
    }

    /// Register and log in a user, returning their token.
    ///
    /// # Panics
    ///
    /// Panics if registration or login does not succeed.
    pub async fn login_as(&self, email: &str) -> String {
        let registered = self
            .post_json(
                "/api/v1/register",
                &json!({
                    "firstname": "Test",
                    "lastname": "User",
                    "email": email,
                    "password": "hunter22",
                }),
                None,
            )
            .await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

        let login = self
            .post_json(
                "/api/v1/login",
                &json!({"email": email, "password": "hunter22"}),
                None,
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);
        login.body["token"]
            .as_str()
            .expect("login returns a token")
            .to_owned()
    }
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body).expect("valid request")
}
