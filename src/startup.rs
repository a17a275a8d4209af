use crate::shutdown;
use portal_eventos::components::{ComponentManager, WeeklyEvents, WeeklyEventsHandle};
use portal_eventos::config::Config;
use portal_eventos::error::other_error;
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Start the components and run until a shutdown signal arrives
pub async fn start_portal(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    {
        let config_read = config.read().await;
        info!(
            "Feed: {} (refresh every {} ms)",
            config_read.feed_url, config_read.refresh_interval_ms
        );
    }

    // Initialize component manager
    let mut component_manager = ComponentManager::new(Arc::clone(&config));

    // Register Weekly Events component
    component_manager.register(WeeklyEvents::default());

    // Create a shared component manager
    let component_manager = Arc::new(component_manager);

    component_manager.init_all().await?;

    // Manual refresh trigger
    #[cfg(unix)]
    if let Some(weekly_events) = component_manager.get_component::<WeeklyEvents>() {
        if let Some(handle) = weekly_events.get_handle().await {
            spawn_manual_refresh_listener(handle);
        }
    }

    // Create shutdown channel
    let (shutdown_send, shutdown_recv) = oneshot::channel();

    // Spawn signal handler task
    let shutdown_components = Arc::clone(&component_manager);
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components).await;
    });

    // Wait for the shutdown signal
    match shutdown_recv.await {
        Ok(()) => info!("Received shutdown signal, exiting..."),
        Err(e) => error!("Signal handler ended unexpectedly: {:?}", e),
    }

    Ok(())
}

/// Refresh the week on SIGHUP (`kill -HUP <pid>`)
#[cfg(unix)]
fn spawn_manual_refresh_listener(handle: WeeklyEventsHandle) {
    use portal_eventos::components::weekly_events::RefreshOutcome;
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = match signal(SignalKind::hangup()) {
        Ok(sighup) => sighup,
        Err(e) => {
            error!("Manual refresh unavailable, failed to listen for SIGHUP: {}", e);
            return;
        }
    };

    tokio::spawn(async move {
        while sighup.recv().await.is_some() {
            info!("Received SIGHUP, refreshing events");
            if let RefreshOutcome::Skipped = handle.refresh_now().await {
                info!("A refresh is already running");
            }
        }
    });
}
