//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Responses are JSON
//! `{"error": ..., "details": ...}` with `details` omitted when empty.
//! Server-side failures are captured to Sentry before responding and never
//! leak their cause to the client.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::{CheckoutError, ErrorCategory};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed; `context` is what the client sees.
    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Request body could not be parsed.
    #[error("Invalid request payload: {0}")]
    InvalidPayload(#[from] JsonRejection),

    /// Missing or invalid access token.
    #[error("Permission denied")]
    Forbidden,
}

impl From<RepositoryError> for AppError {
    fn from(source: RepositoryError) -> Self {
        Self::Database {
            context: "Internal server error",
            source,
        }
    }
}

impl AppError {
    /// Wrap a repository failure with the message shown to the client.
    #[must_use]
    pub const fn database(context: &'static str, source: RepositoryError) -> Self {
        Self::Database { context, source }
    }

    /// Token checks deny access; only a storage failure is a server error.
    #[must_use]
    pub fn from_auth_failure(err: AuthError) -> Self {
        match err {
            AuthError::Repository(source) => Self::from(source),
            _ => Self::Forbidden,
        }
    }

    fn is_server_error(&self) -> bool {
        match self {
            Self::Database { .. } => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Token(_)
            ),
            Self::Checkout(err) => err.category() == ErrorCategory::Upstream,
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::PermissionDenied => StatusCode::FORBIDDEN,
                AuthError::Validation(_)
                | AuthError::InvalidEmail(_)
                | AuthError::UserAlreadyExists(_) => StatusCode::BAD_REQUEST,
                AuthError::Token(_) | AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Checkout(err) => match err.category() {
                ErrorCategory::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorCategory::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// The client-facing body. Internal causes stay out of it.
    fn body(&self) -> ErrorBody {
        match self {
            Self::Database { context, .. } => ErrorBody::new(*context),
            Self::Auth(err) => match err {
                AuthError::Validation(msg) => ErrorBody::new(format!("validation error: {msg}")),
                AuthError::InvalidEmail(e) => ErrorBody::new(format!("validation error: {e}")),
                AuthError::InvalidCredentials
                | AuthError::UserAlreadyExists(_)
                | AuthError::PermissionDenied => ErrorBody::new(err.to_string()),
                AuthError::Token(_) => ErrorBody::new("failed to generate token"),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    ErrorBody::new("Internal server error")
                }
            },
            Self::Checkout(err) => match err {
                CheckoutError::Cart(cart) if cart.is_validation() => {
                    ErrorBody::new("Validation failed").with_details(cart.to_string())
                }
                CheckoutError::Cart(cart) => {
                    ErrorBody::new("Invalid cart items").with_details(cart.to_string())
                }
                CheckoutError::Stock(_)
                | CheckoutError::StockReservation(_)
                | CheckoutError::TotalOutOfRange(_) => {
                    ErrorBody::new(err.to_string())
                }
                CheckoutError::Catalog(_) => ErrorBody::new("Failed to retrieve products"),
                CheckoutError::Persistence(_) => ErrorBody::new("Failed to create order"),
            },
            Self::InvalidPayload(_) => ErrorBody::new("Invalid request payload"),
            Self::Forbidden => ErrorBody::new("Permission denied"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (self.status(), Json(self.body())).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use ecom_core::{CartError, ProductId, StockError};
    use serde_json::{Value, json};

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_failed_has_details() {
        let (status, body) = render(CheckoutError::from(CartError::Empty).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_cart_items() {
        let (status, body) =
            render(CheckoutError::from(CartError::InvalidProductId(-1)).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Invalid cart items", "details": "invalid product ID: -1"})
        );
    }

    #[tokio::test]
    async fn test_stock_error_has_no_details() {
        let err = StockError::InsufficientStock {
            product_id: ProductId::new(4),
            requested: 2,
            available: 1,
        };
        let (status, body) = render(CheckoutError::from(err).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "insufficient stock for product ID 4"}));
    }

    #[tokio::test]
    async fn test_total_out_of_range_is_bad_request() {
        let err = CheckoutError::TotalOutOfRange(rust_decimal::Decimal::new(100_000_000_000_000, 2));
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "order total 1000000000000.00 exceeds the maximum order total"})
        );
    }

    #[tokio::test]
    async fn test_upstream_errors_hide_cause() {
        let (status, body) =
            render(CheckoutError::Persistence(RepositoryError::NotFound).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to create order"}));

        let (status, body) =
            render(AppError::database("Failed to get products", RepositoryError::NotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to get products"}));
    }

    #[tokio::test]
    async fn test_auth_statuses() {
        let (status, body) = render(AuthError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid credentials");

        let (status, body) = render(AppError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Permission denied");

        let (status, _) = render(AuthError::UserAlreadyExists("a@b.co".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_failure_mapping() {
        assert!(matches!(
            AppError::from_auth_failure(AuthError::PermissionDenied),
            AppError::Forbidden
        ));
        assert!(matches!(
            AppError::from_auth_failure(AuthError::Repository(RepositoryError::NotFound)),
            AppError::Database { .. }
        ));
    }
}
