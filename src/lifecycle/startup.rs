//! Startup orchestration.
//!
//! Order: metrics recorder → HTTP server (client + router) → bind listener
//! → serve. Any failure before serving is fatal.

use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Start the relay and serve until shutdown.
pub async fn run(config: RelayConfig, shutdown: &Shutdown) -> Result<(), ServerError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.security.max_body_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let address = &config.observability.metrics_address;
        let addr = address
            .parse()
            .map_err(|_| ServerError::MetricsAddress(address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await
}
