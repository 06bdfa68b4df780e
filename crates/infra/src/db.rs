//! Connection pool wiring.

use std::time::Duration;

use anyhow::Context;
use fireinv_core::StoreError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Open a pool and check the database answers.
pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("failed to connect to database")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("database did not answer health query")?;

    tracing::info!("database connection successful");
    Ok(pool)
}

/// Map a driver error, keeping unique-constraint violations distinguishable.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(db.constraint().unwrap_or("unique").to_string())
        }
        _ => StoreError::backend(err),
    }
}
