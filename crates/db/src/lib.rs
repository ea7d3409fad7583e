//! PostgreSQL storage for the laboratory result importer.
//!
//! Holds the connection pool helpers, the row models, the repositories and
//! the store adapters that plug the database into the core validator.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod config;
pub mod models;
pub mod repositories;
pub mod stores;

pub use config::DbConfig;
pub use stores::{PgReferenceStore, PgSampleSink};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from the loaded configuration.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
