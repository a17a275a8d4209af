use portal_eventos::components::ComponentManager;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info};

/// Wait for a termination signal, stop all components, then notify the main task
pub async fn handle_signals(
    shutdown_send: oneshot::Sender<()>,
    component_manager: Arc<ComponentManager>,
) {
    wait_for_signal().await;

    if let Err(e) = component_manager.shutdown_all().await {
        error!("Error shutting down components: {:?}", e);
    } else {
        info!("All components shut down successfully");
    }

    let _ = shutdown_send.send(());
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    // SIGTERM comes from service managers and container runtimes
    let sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => Some(sigterm),
        Err(e) => {
            error!("Failed to listen for SIGTERM, waiting for Ctrl+C only: {}", e);
            None
        }
    };

    wait_for_terminate_or_ctrl_c(sigterm).await;
}

#[cfg(unix)]
async fn wait_for_terminate_or_ctrl_c(sigterm: Option<tokio::signal::unix::Signal>) {
    let Some(mut sigterm) = sigterm else {
        wait_for_ctrl_c().await;
        return;
    };

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
        _ = wait_for_ctrl_c() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test_log::test(tokio::test)]
    async fn missing_sigterm_handler_falls_back_to_ctrl_c() {
        let waited =
            tokio::time::timeout(Duration::from_millis(100), wait_for_terminate_or_ctrl_c(None))
                .await;

        // No signal arrived, so shutdown must not have started
        assert!(waited.is_err());
    }
}
