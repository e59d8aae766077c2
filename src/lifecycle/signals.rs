//! OS signal handling.
//!
//! SIGINT (Ctrl+C), SIGTERM on unix, or a [`Shutdown`](super::Shutdown)
//! broadcast all end the server gracefully: accept stops, in-flight requests
//! finish.

use tokio::sync::broadcast;

/// Resolve on the first shutdown trigger.
pub async fn wait_for_shutdown(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Shutdown signal received"),
        _ = terminate => tracing::info!("Terminate signal received"),
        _ = shutdown.recv() => tracing::info!("Shutdown requested"),
    }
}
