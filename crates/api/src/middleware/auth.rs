//! Access-token authentication extractor.

use axum::{
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;

use ecom_core::UserId;

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Extractor that requires a valid access token.
///
/// The token is read from the `Authorization` header (with or without a
/// `Bearer ` prefix), falling back to the `token` query parameter. A missing
/// or invalid token, or one for a user that no longer exists, is rejected
/// with 403 `Permission denied`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(user_id): RequireUser) -> String {
///     format!("Hello, user {user_id}!")
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireUser(pub UserId);

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or(AppError::Forbidden)?;

        let auth = AuthService::new(state.users(), state.jwt());
        let user_id = auth
            .authenticate(&token)
            .await
            .map_err(AppError::from_auth_failure)?;

        set_sentry_user(&user_id);
        tracing::Span::current().record("user_id", tracing::field::display(user_id));
        Ok(Self(user_id))
    }
}

fn token_from_parts(parts: &Parts) -> Option<String> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
        .filter(|token| !token.is_empty());
    if let Some(token) = header {
        return Some(token.to_owned());
    }

    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(query)| query.token)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(request: Request<()>) -> Parts {
        request.into_parts().0
    }

    #[test]
    fn test_token_from_bearer_header() {
        let parts = parts(
            Request::builder()
                .header(AUTHORIZATION, "Bearer abc.def.ghi")
                .body(())
                .unwrap(),
        );
        assert_eq!(token_from_parts(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_token_from_bare_header() {
        let parts = parts(
            Request::builder()
                .header(AUTHORIZATION, "abc.def.ghi")
                .body(())
                .unwrap(),
        );
        assert_eq!(token_from_parts(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_token_from_query() {
        let parts = parts(
            Request::builder()
                .uri("/api/v1/cart/checkout?token=abc.def.ghi")
                .body(())
                .unwrap(),
        );
        assert_eq!(token_from_parts(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_token() {
        let parts = parts(Request::builder().uri("/x?other=1").body(()).unwrap());
        assert_eq!(token_from_parts(&parts), None);
    }
}
