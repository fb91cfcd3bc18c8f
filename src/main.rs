//! Demonstration binary: connects to a backend, lists containers, and prints
//! an overview plus current metrics for the first one found.

use container_console::adaptor::ContainerAdaptor;
use container_console::api::ContainerApi;
use container_console::config;
use container_console::models::{FilterCriteria, TimeRange};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> container_console::errors::Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()?;
    info!(
        base_url = %app_config.connection.base_url,
        "Successfully processed application configuration."
    );

    // 4. Build the API client and adaptor
    let api = ContainerApi::new(&app_config.connection)
        .inspect_err(|e| error!("Failed to build API client: {e}"))?;
    let adaptor = ContainerAdaptor::new(api);

    // 5. List containers and show the first one
    let page = adaptor.list(&FilterCriteria::default()).await?;
    info!(total = page.total, "Fetched container list.");

    let Some(first) = page.items.first() else {
        info!("No containers registered on this backend.");
        return Ok(());
    };

    let overview = adaptor.overview(first.id).await?;
    info!(
        id = overview.id,
        name = %overview.name,
        status = overview.status_label,
        location = %overview.location_label,
        updated = %overview.updated_relative,
        "Container overview"
    );

    let metrics = adaptor.metrics(first.id, TimeRange::default()).await?;
    info!(
        air_temperature = metrics.air_temperature,
        humidity = metrics.humidity,
        co2 = metrics.co2,
        space_utilization = metrics.space_utilization_percent,
        "Current metrics"
    );

    Ok(())
}
