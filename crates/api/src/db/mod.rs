//! Persistence for accounts and carts.
//!
//! # Database: `sweet_bliss`
//!
//! ## Tables
//!
//! - `users` - Accounts (name, normalised email, argon2 password hash)
//! - `carts` - One document per user: `items` as `JSONB` plus a `version`
//!   counter used for compare-and-swap writes
//!
//! # Store traits
//!
//! Handlers never see a pool directly. They go through [`UserStore`] and
//! [`CartStore`], implemented by the `PostgreSQL` repositories in this module
//! and, for tests, by [`memory::MemoryStore`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/`, embedded as
//! [`MIGRATOR`], and run via:
//! ```bash
//! cargo run -p sweet-bliss-cli -- migrate
//! ```

pub mod carts;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
mod traits;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartRepository;
pub use traits::{CartStore, UserStore};
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// The pool connects eagerly so a bad URL or unreachable server fails at
/// startup rather than on the first request.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map an insert error, turning unique violations into `Conflict`.
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
