//! Service startup and the serve loop.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;

use volt_engine::config::ValidatedConfig;
use volt_engine::server::{AppState, router};
use volt_engine::store::{FixtureError, MemoryStore, load_fixtures};
use volt_engine::transport::ReqwestClient;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The outbound HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The fixture file could not be loaded into the store.
    #[error("Failed to load fixtures: {0}")]
    Fixtures(#[from] FixtureError),

    /// The listen address could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested
        addr: SocketAddr,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Builds the service from `config` and serves until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client cannot be created
/// - The fixture file cannot be read, parsed or applied
/// - The listen address cannot be bound
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let client =
        ReqwestClient::with_timeout(config.execute_timeout).map_err(RunError::HttpClient)?;

    let store = Arc::new(MemoryStore::new().with_log_cap(config.max_logs_per_webhook));
    if let Some(ref path) = config.fixtures {
        load_fixtures(path, &store)?;
    }

    let app = router(AppState::new(client, store), config.max_body_bytes);

    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|source| RunError::Bind {
            addr: config.listen,
            source,
        })?;
    let local_addr = listener.local_addr().unwrap_or(config.listen);
    tracing::info!(addr = %local_addr, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(RunError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
///
/// A signal whose handler cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received, stopping...");
}
