use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use tsm_query::ResourceResolver;

/// Resolves on Ctrl+C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// Release backend resources, giving up after `timeout`
pub async fn close_resolver(resolver: Arc<dyn ResourceResolver>, timeout: Duration) {
    debug!("Closing {} backend...", resolver.backend_type());

    match tokio::time::timeout(timeout, resolver.close()).await {
        Ok(Ok(())) => info!("Backend closed"),
        Ok(Err(e)) => warn!("Error closing backend: {}", e),
        Err(_) => warn!("Backend close exceeded {:?}, forcing shutdown", timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsm_query::FixtureResolver;

    #[tokio::test]
    async fn test_close_resolver_completes() {
        let resolver: Arc<dyn ResourceResolver> = Arc::new(FixtureResolver::default());
        close_resolver(resolver, Duration::from_secs(1)).await;
    }
}
