//! Authentication service.
//!
//! Password registration and login, and the access tokens issued on login.

mod error;
pub mod jwt;

pub use error::AuthError;
pub use jwt::JwtKeys;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use tracing::instrument;

use ecom_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::models::{NewUser, User};
use crate::store::UserStore;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Body of `POST /register`.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    jwt: &'a JwtKeys,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(users: &'a dyn UserStore, jwt: &'a JwtKeys) -> Self {
        Self { users, jwt }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a name is blank or the password is
    /// too short, `AuthError::InvalidEmail` if the email format is invalid, and
    /// `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip_all)]
    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        let first_name = required("firstname", &registration.firstname)?;
        let last_name = required("lastname", &registration.lastname)?;
        let email = Email::parse(&registration.email)?;
        validate_password(&registration.password)?;

        let password_hash = hash_password(&registration.password)?;
        let new_user = NewUser {
            first_name,
            last_name,
            email,
        };

        let user = self
            .users
            .create_with_password(&new_user, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    AuthError::UserAlreadyExists(registration.email.trim().to_owned())
                }
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Login with email and password, returning the user and a fresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.jwt.issue(user.id)?;
        Ok((user, token))
    }

    /// Resolve a token to the user ID it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PermissionDenied` if the token is invalid or the
    /// user no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<UserId, AuthError> {
        let user_id = self.jwt.verify(token)?;
        match self.users.get_by_id(user_id).await? {
            Some(user) => Ok(user.id),
            None => {
                tracing::debug!(%user_id, "token for unknown user");
                Err(AuthError::PermissionDenied)
            }
        }
    }
}

fn required(field: &str, value: &str) -> Result<String, AuthError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuthError::Validation(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
