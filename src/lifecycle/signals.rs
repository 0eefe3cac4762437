//! OS signal handling.

/// Resolve once Ctrl+C (SIGINT) is received.
///
/// If the handler cannot be installed the error is logged and the future
/// never resolves, so the server keeps serving instead of exiting at once.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
