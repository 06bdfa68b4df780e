//! Store selection and operation wiring.

use std::sync::Arc;

use anyhow::Context;

use fireinv_infra::{
    InMemoryProductStore, InMemoryUserStore, PostgresProductStore, PostgresUserStore, db,
};

use crate::config::AppConfig;
use crate::operations::{Operations, SharedProductStore, SharedUserStore};

/// Shared application state handed to every handler.
pub type AppServices = Arc<Operations>;

/// Wire stores and operations; Postgres when `DATABASE_URL` is set, in-memory
/// otherwise. Also creates the bootstrap admin if one is configured.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let (users, products) = match &config.database_url {
        Some(url) => {
            let pool = db::connect(url).await?;
            tracing::info!("using Postgres stores");
            (
                Arc::new(PostgresUserStore::new(pool.clone())) as SharedUserStore,
                Arc::new(PostgresProductStore::new(pool)) as SharedProductStore,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            (
                Arc::new(InMemoryUserStore::new()) as SharedUserStore,
                Arc::new(InMemoryProductStore::new()) as SharedProductStore,
            )
        }
    };

    let operations = Operations::new(&config.auth, users, products)
        .context("failed to initialise auth services")?;

    if let Some(admin) = &config.admin {
        operations
            .bootstrap_admin(admin)
            .await
            .context("failed to create bootstrap admin")?;
    }

    Ok(Arc::new(operations))
}
