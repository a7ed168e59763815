//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration payload failed validation.
    #[error("invalid payload: {0}")]
    Validation(String),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] ecom_core::EmailError),

    /// Wrong password or unknown email. The two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user with email {0} already exists")]
    UserAlreadyExists(String),

    /// Missing, malformed, expired, or badly signed access token, or a token
    /// for a user that no longer exists.
    #[error("permission denied")]
    PermissionDenied,

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
