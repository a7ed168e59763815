//! User domain types.

use chrono::{DateTime, Utc};

use ecom_core::{Email, UserId};

/// A registered customer.
///
/// The password hash never lives on this type; it is read alongside the user
/// only when verifying a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new account. Fields are already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
}
