mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use clap::{Args, ValueEnum};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tsm_api::{ApiDoc, ApiState};
use tsm_query::{FixtureResolver, ResourceResolver};
use tsm_query_postgres::config::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_POOL_SIZE};
use tsm_query_postgres::{PostgresConfig, PostgresResolver};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use shutdown::{close_resolver, shutdown_signal};

const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Where resources are read from
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Multi-tenant PostgreSQL store
    Postgres,
    /// Built-in in-memory data set
    Fixture,
}

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "0.0.0.0:8000", env = "TSM_ADDRESS")]
    pub address: String,

    /// Database connection URL
    #[arg(long, env = "DB_URL")]
    pub database_url: Option<String>,

    /// Resolver backend
    #[arg(long, value_enum, default_value_t = Backend::Postgres, env = "TSM_BACKEND")]
    pub backend: Backend,

    /// Maximum number of pooled database connections
    #[arg(long, default_value_t = DEFAULT_POOL_SIZE, env = "TSM_POOL_SIZE")]
    pub pool_size: usize,

    /// Seconds to wait for a new database connection
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs(), env = "TSM_CONNECT_TIMEOUT_SECS")]
    pub connect_timeout_secs: u64,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run())
    }

    async fn run(self) -> anyhow::Result<()> {
        let resolver = self.build_resolver().await?;
        info!("Using {} backend", resolver.backend_type());

        let app = build_app(resolver.clone());

        let listener = TcpListener::bind(&self.address).await?;
        info!("Mapping API listening on {}", self.address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Server stopped");

        close_resolver(resolver, CLOSE_TIMEOUT).await;
        Ok(())
    }

    async fn build_resolver(&self) -> anyhow::Result<Arc<dyn ResourceResolver>> {
        match self.backend {
            Backend::Fixture => Ok(Arc::new(FixtureResolver::default())),
            Backend::Postgres => {
                let database_url = self.database_url.clone().ok_or_else(|| {
                    anyhow::anyhow!("--database-url (DB_URL) is required for the postgres backend")
                })?;

                let config = PostgresConfig::new(database_url)
                    .with_pool_size(self.pool_size)
                    .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs));

                debug!("Connecting to {}", config.display_target());
                let resolver = PostgresResolver::connect(&config).await.map_err(|e| {
                    anyhow::anyhow!("Failed to connect to {}: {}", config.display_target(), e)
                })?;

                Ok(Arc::new(resolver))
            }
        }
    }
}

/// Mapping routes plus the OpenAPI document and Swagger UI
fn build_app(resolver: Arc<dyn ResourceResolver>) -> Router {
    let state = Arc::new(ApiState::new(resolver));

    tsm_api::router(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
