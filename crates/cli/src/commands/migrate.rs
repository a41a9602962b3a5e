//! Database migration commands.
//!
//! Migrations live in `crates/api/migrations/` and are embedded into the API
//! crate as [`MIGRATOR`], so the CLI always applies exactly the set the
//! server was built with.
//!
//! # Environment Variables
//!
//! - `SWEETBLISS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use std::collections::HashSet;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

use sweet_bliss_api::db::MIGRATOR;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

fn database_url() -> Result<SecretString, MigrationError> {
    dotenvy::dotenv().ok();

    std::env::var("SWEETBLISS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("SWEETBLISS_DATABASE_URL"))
}

async fn connect() -> Result<PgPool, MigrationError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(database_url.expose_secret()).await?)
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

/// Log every embedded migration and whether it has been applied.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn status() -> Result<(), MigrationError> {
    let pool = connect().await?;

    let applied = applied_versions(
        sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(&pool)
            .await,
    )?;

    for migration in MIGRATOR.iter() {
        let state = if applied.contains(&migration.version) {
            "applied"
        } else {
            "pending"
        };
        tracing::info!(
            version = migration.version,
            description = %migration.description,
            "{state}"
        );
    }

    Ok(())
}

/// Postgres `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";

/// Versions recorded as applied. The bookkeeping table only exists once
/// `migrate` has run, so its absence means nothing is applied yet; every
/// other failure is returned.
fn applied_versions(
    rows: Result<Vec<i64>, sqlx::Error>,
) -> Result<HashSet<i64>, sqlx::Error> {
    match rows {
        Ok(versions) => Ok(versions.into_iter().collect()),
        Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNDEFINED_TABLE) => {
            Ok(HashSet::new())
        }
        Err(e) => Err(e),
    }
}
