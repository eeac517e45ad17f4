//! Connection settings for the store.

use std::time::Duration;

use tsm_query::{QueryError, Result};

pub const DEFAULT_POOL_SIZE: usize = 16;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_KEEPALIVES_IDLE: Duration = Duration::from_secs(20);
pub const DEFAULT_KEEPALIVES_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_KEEPALIVES_RETRIES: u32 = 2;

/// Pool and socket settings for the PostgreSQL store
///
/// The keepalive settings bound how long a silently dead peer is tolerated
/// before the socket is declared lost: roughly `idle + interval * retries`.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// libpq-style connection string or `postgresql://` URL
    pub database_url: String,
    /// Maximum number of pooled connections
    pub pool_size: usize,
    pub connect_timeout: Duration,
    pub keepalives_idle: Duration,
    pub keepalives_interval: Duration,
    pub keepalives_retries: u32,
}

impl PostgresConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_size: DEFAULT_POOL_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            keepalives_idle: DEFAULT_KEEPALIVES_IDLE,
            keepalives_interval: DEFAULT_KEEPALIVES_INTERVAL,
            keepalives_retries: DEFAULT_KEEPALIVES_RETRIES,
        }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Build the driver configuration, applying timeout and keepalive tuning
    pub fn pg_config(&self) -> Result<tokio_postgres::Config> {
        if self.pool_size == 0 {
            return Err(QueryError::InvalidConfiguration(
                "pool size must be at least 1".to_string(),
            ));
        }

        let mut config: tokio_postgres::Config = self.database_url.parse().map_err(|e| {
            QueryError::InvalidConfiguration(format!("Invalid database URL: {}", e))
        })?;

        config
            .connect_timeout(self.connect_timeout)
            .keepalives(true)
            .keepalives_idle(self.keepalives_idle)
            .keepalives_interval(self.keepalives_interval)
            .keepalives_retries(self.keepalives_retries);

        Ok(config)
    }

    /// Connection target for log lines, without credentials
    pub fn display_target(&self) -> String {
        match self.pg_config() {
            Ok(config) => {
                let hosts: Vec<String> = config
                    .get_hosts()
                    .iter()
                    .map(|h| match h {
                        tokio_postgres::config::Host::Tcp(host) => host.clone(),
                        #[cfg(unix)]
                        tokio_postgres::config::Host::Unix(path) => path.display().to_string(),
                    })
                    .collect();
                format!(
                    "{}/{}",
                    hosts.join(","),
                    config.get_dbname().unwrap_or_default()
                )
            }
            Err(_) => "<invalid>".to_string(),
        }
    }
}
