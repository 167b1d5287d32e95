//! Service state and server entry point

use std::sync::Arc;

use donelist_store::TaskStore;

use crate::config::{ConfigError, ServiceConfig};
use crate::router::router;

/// Shared state handed to every handler: the store plus configuration.
pub struct TaskApi<S> {
    pub store: Arc<S>,
    pub config: ServiceConfig,
}

impl<S> TaskApi<S> {
    /// Wrap a store and configuration into handler state.
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }
}

impl<S> Clone for TaskApi<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

/// Errors that prevent the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bind the configured address and serve until ctrl-c.
pub async fn serve<S: TaskStore + 'static>(api: TaskApi<S>) -> Result<(), ServeError> {
    let addr = api.config.bind_addr;
    let app = router(api)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Task service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
