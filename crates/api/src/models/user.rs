//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sweet_bliss_core::{Email, UserId};

/// An account holder (domain type).
///
/// The password hash is deliberately absent; it only travels alongside a
/// `User` when the credential store is asked for it during login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name given at signup.
    pub name: String,
    /// Normalised email address.
    pub email: Email,
    /// When the account was created.
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

/// A user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
}
