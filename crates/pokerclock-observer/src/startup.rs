//! Observer startup helper for embedding in the engine binary.
//!
//! [`spawn_observer`] binds the listener up front, so a busy port is
//! reported before the clock starts, then serves on a background Tokio
//! task alongside the tick driver.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{self, ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the observer server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// A running observer server.
#[derive(Debug)]
pub struct ObserverHandle {
    /// Address the server actually bound.
    pub addr: SocketAddr,
    /// The background serving task. Finishes after a stop request.
    pub task: JoinHandle<()>,
}

/// Bind the observer and serve it on a background Tokio task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is invalid or the
/// port cannot be bound.
pub async fn spawn_observer(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<ObserverHandle, StartupError> {
    let listener = server::bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    let task = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, state).await {
            tracing::error!(error = %e, "Observer server exited with error");
        }
    });

    tracing::info!(%addr, "Observer server spawned on background task");

    Ok(ObserverHandle { addr, task })
}
