//! SQLite-backed persistence.
//!
//! A single connection pool is shared by the repository implementations in
//! the submodules. Foreign keys are enabled per connection because SQLite
//! leaves them off by default.

use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::error::InfraError;

mod books;
mod reviews;
mod util;

pub(crate) use util::map_sqlx_error;

#[derive(Clone)]
pub struct SqliteRepositories {
    pool: Arc<SqlitePool>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open the pool, creating the database file when it does not exist yet.
    pub async fn connect(url: &str, max_connections: NonZeroU32) -> Result<Self, InfraError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|err| InfraError::database(format!("invalid database url: {err}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.get())
            .connect_with(options)
            .await
            .map_err(|err| InfraError::database(format!("failed to open database: {err}")))?;

        info!(target = "recensio::db", url, "Database pool ready");
        Ok(Self::new(pool))
    }

    pub async fn run_migrations(&self) -> Result<(), InfraError> {
        sqlx::migrate!("./migrations")
            .run(self.pool())
            .await
            .map_err(|err| InfraError::database(format!("migration failed: {err}")))?;
        info!(target = "recensio::db", "Migrations applied");
        Ok(())
    }

    /// Cheap liveness probe used by the health endpoint.
    pub async fn health_check(&self) -> Result<(), InfraError> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map_err(|err| InfraError::database(err.to_string()))?;
        Ok(())
    }
}
