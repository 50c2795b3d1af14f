//! PostgreSQL connection pool for the identity and restriction stores.

use sqlx::postgres::PgPoolOptions;

use crate::config::Config;

pub type DbPool = sqlx::PgPool;

/// Build the pool the gateway's stores share, sized from config
/// (`DB_MAX_CONNECTIONS`, `DB_ACQUIRE_TIMEOUT_SECS`).
pub async fn create_pool(config: &Config) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_acquire_timeout)
        .connect(&config.database_url)
        .await
}
