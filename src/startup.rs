use crate::components::{calendar_alerts::CalendarAlerts, ComponentManager};
use crate::config::Config;
use crate::error::Error;
use crate::notifier::{Notify, TelegramNotifier};
use crate::shutdown;
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

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

/// Initialize and run the alert engine until a shutdown signal arrives
pub async fn start_engine(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    // Build the chat transport
    let notifier: Arc<dyn Notify> = {
        let config_read = config.read().await;
        Arc::new(TelegramNotifier::new(
            config_read.telegram_bot_token.clone(),
        ))
    };

    // Initialize component manager
    let mut component_manager = ComponentManager::new(Arc::clone(&config));

    // Register the calendar alerts component
    {
        let config_read = config.read().await;
        if config_read.is_component_enabled("calendar_alerts") {
            component_manager.register(CalendarAlerts::new());
        } else {
            info!("Calendar alerts component is disabled in configuration");
        }
    }

    // Create a shared component manager
    let component_manager = Arc::new(component_manager);

    // Create shutdown channel
    let (shutdown_send, shutdown_recv) = oneshot::channel();

    // Clone component manager for shutdown handler
    let shutdown_components = Arc::clone(&component_manager);

    // Spawn signal handler task
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components).await;
    });

    // Initialize components
    if let Err(e) = component_manager
        .init_all(Arc::clone(&config), notifier)
        .await
    {
        error!("Failed to initialize components: {:?}", e);
    }

    info!("Alert engine running");

    // Wait for the shutdown handler to release us
    let _ = shutdown_recv.await;
    info!("Received shutdown signal, engine stopped");

    Ok(())
}
