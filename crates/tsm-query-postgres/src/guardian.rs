//! Pooled connection management.
//!
//! Every handle given out has been rolled back first, so a request never
//! inherits a transaction that an earlier request left in a failed state.

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime, Status};
use tokio_postgres::NoTls;
use tracing::{debug, warn};
use tsm_query::{QueryError, Result};

use crate::config::PostgresConfig;

/// A pooled connection; dropping it hands the connection back to the pool
pub type PooledClient = deadpool_postgres::Object;

/// Attempts at handing out a rolled-back connection before giving up
const MAX_HANDOUT_ATTEMPTS: usize = 2;

/// Owns the connection pool and hands out ready-to-use connections
#[derive(Clone)]
pub struct ConnectionGuardian {
    pool: Pool,
}

impl ConnectionGuardian {
    /// Build the pool without opening any connection
    pub fn new(config: &PostgresConfig) -> Result<Self> {
        let manager = Manager::from_config(
            config.pg_config()?,
            NoTls,
            ManagerConfig {
                // Closed connections are replaced on checkout
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(manager)
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .create_timeout(Some(config.connect_timeout))
            .build()
            .map_err(|e| {
                QueryError::InvalidConfiguration(format!("Failed to create pool: {}", e))
            })?;

        Ok(Self { pool })
    }

    /// Build the pool and prove the store is reachable
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        debug!("Connecting to PostgreSQL: {}", config.display_target());

        let guardian = Self::new(config)?;
        // The first handout opens a connection; failing here fails startup
        drop(guardian.acquire().await?);

        debug!(
            "Connected to PostgreSQL {} (pool size {})",
            config.display_target(),
            config.pool_size
        );
        Ok(guardian)
    }

    /// Get a connection that is open and outside any transaction
    pub async fn acquire(&self) -> Result<PooledClient> {
        let mut last_error = None;

        for _ in 0..MAX_HANDOUT_ATTEMPTS {
            let client = self.checkout().await?;

            match client.batch_execute("ROLLBACK").await {
                Ok(()) => return Ok(client),
                Err(e) => {
                    warn!("Rollback on pooled connection failed, reopening: {}", e);
                    // Detach from the pool so the broken connection is closed
                    drop(PooledClient::take(client));
                    last_error = Some(e);
                }
            }
        }

        let detail = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt made".to_string());
        Err(QueryError::ConnectionFailed(format!(
            "Could not obtain a usable connection: {}",
            detail
        )))
    }

    /// Pool checkout with a single retry
    async fn checkout(&self) -> Result<PooledClient> {
        match self.pool.get().await {
            Ok(client) => Ok(client),
            Err(first) => {
                warn!("PostgreSQL connection checkout failed, retrying: {}", first);
                self.pool.get().await.map_err(|e| {
                    QueryError::ConnectionFailed(format!("PostgreSQL connection failed: {}", e))
                })
            }
        }
    }

    pub fn status(&self) -> Status {
        self.pool.status()
    }

    /// Stop handing out connections and close idle ones
    pub fn close(&self) {
        let status = self.status();
        debug!(
            "Closing PostgreSQL pool ({} open, {} idle)",
            status.size, status.available
        );
        self.pool.close();
    }
}
