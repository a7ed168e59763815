//! Business logic services for the API.
//!
//! # Services
//!
//! - `auth` - Registration, password login, and access tokens
//! - `checkout` - Turning a cart into a persisted order

pub mod auth;
pub mod checkout;
