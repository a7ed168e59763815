//! Domain models owned by the API crate.

pub mod user;

pub use user::{NewUser, User};
