mod components;
mod config;
mod error;
mod notifier;
mod shutdown;
mod startup;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting meetbot");

    // Load configuration
    let config = startup::load_config().await?;

    // Start the alert engine
    startup::start_engine(config).await
}
