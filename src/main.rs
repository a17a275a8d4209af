mod shutdown;
mod startup;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting portal-eventos");

    // Load configuration
    let config = startup::load_config().await?;

    // Start polling the events feed
    startup::start_portal(config).await
}
