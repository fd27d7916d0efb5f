//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the relay route
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Own the single outbound HTTP client
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::proxy::{proxy_get, proxy_post};
use crate::http::request::{request_span, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::CachePolicy;
use crate::lifecycle::signals::shutdown_signal;
use crate::relay::Forwarder;

/// Path of the relay route.
pub const PROXY_PATH: &str = "/api/proxy";

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to start metrics endpoint: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
    pub get_cache: CachePolicy,
}

impl AppState {
    pub fn new(client: reqwest::Client, config: &RelayConfig) -> Self {
        Self {
            forwarder: Forwarder::new(client, config.upstream.clone()),
            get_cache: CachePolicy::MaxAge(config.upstream.get_cache_max_age_secs),
        }
    }
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder().build()?;
        let state = Arc::new(AppState::new(client, &config));
        let router = create_router(state, &config);

        Ok(Self { router, config })
    }

    /// The fully layered router, for driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Serve until the shutdown broadcast fires or the process is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => tracing::info!("Shutdown requested"),
                    _ = shutdown_signal() => {},
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn create_router(state: Arc<AppState>, config: &RelayConfig) -> Router {
    Router::new()
        .route(PROXY_PATH, get(proxy_get).post(proxy_post))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
}
