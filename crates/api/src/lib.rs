//! ecom API library.
//!
//! The HTTP service as a library, so the router can be driven in tests
//! without a socket or a database.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::from_fn,
    routing::get,
};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full router: health checks, `/api/v1`, request IDs, and tracing.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/v1", routes::routes())
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(pool) = state.pool() else {
        return StatusCode::OK;
    };
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use tower::ServiceExt;

    use super::*;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::store::memory::InMemoryStore;
    use crate::testing::test_state;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(test_state(&InMemoryStore::new()));
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_ready_without_database() {
        let app = app(test_state(&InMemoryStore::new()));
        let response = app.oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_generated_and_echoed() {
        let app = app(test_state(&InMemoryStore::new()));

        let response = app.clone().oneshot(get("/health")).await.unwrap();
        let generated = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert_eq!(generated.len(), 36);

        let request = Request::builder()
            .uri("/health")
            .header(REQUEST_ID_HEADER, "upstream-123")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "upstream-123");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = app(test_state(&InMemoryStore::new()));
        let response = app.oneshot(get("/api/v2/products")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
