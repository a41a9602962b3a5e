//! Cart error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No line item with the requested name (or no cart at all).
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// Quantity outside the accepted range.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Item name or image missing or too long.
    #[error("invalid item: {0}")]
    InvalidItem(String),

    /// Adding the item would exceed the line-item limit.
    #[error("cart already holds {limit} different items")]
    CartFull { limit: usize },

    /// Every write attempt lost a race with another writer.
    #[error("cart was modified concurrently after {attempts} attempts")]
    Conflict { attempts: usize },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
