//! Cart repository for `PostgreSQL`.
//!
//! Each owner has one row in `carts`. The line items live in a `JSONB`
//! column and are always written whole; `version` guards those writes so a
//! stale read can never overwrite a newer cart.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use sweet_bliss_core::UserId;

use super::{CartStore, RepositoryError};
use crate::models::cart::{Cart, LineItem, VersionedCart};

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    items: Json<Vec<LineItem>>,
    version: i64,
}

impl From<CartRow> for VersionedCart {
    fn from(row: CartRow) -> Self {
        Self {
            cart: Cart::from_items(row.items.0),
            version: row.version,
        }
    }
}

/// Repository for cart database operations.
#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for CartRepository {
    async fn load(&self, owner: UserId) -> Result<Option<VersionedCart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT items, version FROM carts WHERE user_id = $1",
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::ColumnDecode { source, .. } => {
                RepositoryError::DataCorruption(format!("invalid cart items in database: {source}"))
            }
            other => RepositoryError::Database(other),
        })?;

        Ok(row.map(Into::into))
    }

    async fn insert(&self, owner: UserId, cart: &Cart) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO carts (user_id, items, version)
            VALUES ($1, $2, 0)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(owner)
        .bind(Json(cart.items()))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn compare_and_swap(
        &self,
        owner: UserId,
        expected_version: i64,
        cart: &Cart,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE carts
            SET items = $1, version = version + 1, updated_at = now()
            WHERE user_id = $2 AND version = $3
            ",
        )
        .bind(Json(cart.items()))
        .bind(owner)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
