/**
 * Server Configuration
 *
 * Chooses the persistence backend from `AppConfig`.
 *
 * - `DATABASE_URL` unset: an in-memory store is used and a warning is
 *   logged. Data does not survive a restart.
 * - `DATABASE_URL` set: a Postgres pool is opened and migrations are run.
 *   Failing to connect or migrate aborts startup.
 */

use std::sync::Arc;

use crate::backend::store::{BoardStore, MemoryStore, PgStore, StoreError};
use crate::shared::AppConfig;

pub async fn load_store(config: &AppConfig) -> Result<Arc<dyn BoardStore>, StoreError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Using the in-memory store; data will not persist.");
        return Ok(Arc::new(MemoryStore::new()));
    };

    tracing::info!("Connecting to database...");
    let store = PgStore::connect(database_url, config.database_max_connections)
        .await
        .map_err(|e| {
            tracing::error!("Failed to initialize database: {:?}", e);
            e
        })?;
    tracing::info!("Database connection pool created and migrations applied");

    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_without_database_url() {
        let config = AppConfig::builder().jwt_secret("secret").build().unwrap();
        let store = load_store(&config).await.unwrap();
        assert!(store.user_by_email("nobody@example.com").await.unwrap().is_none());
    }
}
