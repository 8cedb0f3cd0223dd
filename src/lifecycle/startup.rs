//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the Forwarder from validated configuration
//! - Start the metrics exporter when enabled
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::forwarder::{ForwardError, Forwarder};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Anything that stops the gateway from coming up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build backend client: {0}")]
    Client(#[from] ForwardError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bring up the HTTP hosting layer and run it until `shutdown` fires.
pub async fn serve(config: GatewayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.backend.origin().is_none() {
        tracing::warn!("BACKEND_URL is not set; every request will fail with 500");
    }

    let forwarder = Arc::new(Forwarder::new(config.backend.clone(), &config.timeouts)?);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let server = HttpServer::with_forwarder(config, forwarder);
    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
