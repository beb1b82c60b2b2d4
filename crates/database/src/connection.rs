use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPoolOptions, Postgres};
use sqlx::PgPool;
use std::time::Duration;

/// Hands out pooled PostgreSQL connections.
///
/// A connection returned by [`ConnectionProvider::acquire`] goes back to the
/// pool when it is dropped, so every exit path of a caller releases it.
/// Cloning the provider is cheap and shares the same pool.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    pool: PgPool,
}

impl ConnectionProvider {
    /// Wraps an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Establishes the pool and opens its first connection, so a bad URL or
    /// unreachable server is reported here rather than on the first query.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DbError> {
        let pool = pool_options(settings)?
            .connect(&settings.url)
            .await
            .map_err(DbError::Connection)?;

        tracing::info!(
            max_connections = settings.max_connections,
            "Connected to the database."
        );

        Ok(Self::new(pool))
    }

    /// Builds the pool without connecting. The first `acquire` opens a
    /// connection.
    pub fn connect_lazy(settings: &DatabaseSettings) -> Result<Self, DbError> {
        let pool = pool_options(settings)?
            .connect_lazy(&settings.url)
            .map_err(|e| DbError::ConnectionConfig(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Checks out one connection for the duration of a call.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, DbError> {
        self.pool.acquire().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to acquire a database connection.");
            DbError::Connection(e)
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn pool_options(settings: &DatabaseSettings) -> Result<PgPoolOptions, DbError> {
    if settings.url.trim().is_empty() {
        return Err(DbError::ConnectionConfig(
            "database url must be set.".to_string(),
        ));
    }

    Ok(PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs)))
}
