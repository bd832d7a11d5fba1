use std::sync::Arc;

use clap::Parser;

use crm_backend::cli::{self, Cli};
use crm_backend::config::{init_logging, BootstrapSettings, DatabaseConnections};
use crm_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;
    let cli = Cli::parse();

    let settings = BootstrapSettings::from_env()?;
    tracing::debug!(settings = ?settings, "Bootstrap settings loaded");

    let connections = DatabaseConnections::connect(&settings).await?;
    let app_data = Arc::new(AppData::init(connections, settings.page_limits()));

    cli::execute_command(cli, app_data).await
}
