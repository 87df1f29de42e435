//! PostgreSQL persistence for articles, versions and review submissions.
//!
//! - [`models`] -- `FromRow` row structs and request DTOs.
//! - [`repositories`] -- zero-sized repositories with async query methods.
//! - [`workflow`] -- the transactional submit / review operations.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod workflow;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify connectivity.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
