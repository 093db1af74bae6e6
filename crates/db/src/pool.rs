//! Postgres connection pool.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use crate::DbError;

/// Type alias for the shared Postgres pool.
pub type DbPool = PgPool;

/// `application_name` reported to the server unless overridden.
pub const DEFAULT_APPLICATION_NAME: &str = "pg-call-function";

/// Settings for [`create_pool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// How long a call waits for a free connection before failing.
    pub acquire_timeout: Duration,
    /// Shown in `pg_stat_activity`, so calls made through this crate can be
    /// told apart from other sessions.
    pub application_name: String,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            application_name: DEFAULT_APPLICATION_NAME.to_owned(),
        }
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    /// Parse the URL and apply the session settings; does not connect.
    pub fn connect_options(&self) -> Result<PgConnectOptions, DbError> {
        Ok(PgConnectOptions::from_str(&self.database_url)?.application_name(&self.application_name))
    }
}

/// Create a new connection pool from `config`.
pub async fn create_pool(config: &PoolConfig) -> Result<DbPool, DbError> {
    info!(
        "Connecting to database (max_connections={}, application_name={})",
        config.max_connections, config.application_name
    );
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(config.connect_options()?)
        .await?;
    Ok(pool)
}
