use crate::app_data::AppData;

/// Run pending database migrations
///
/// # Returns
/// * `Ok(())` - Migrations completed successfully
/// * `Err(...)` - Migration failed
pub async fn run_migrations(app_data: &AppData) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");
    app_data.connections.migrate().await?;
    tracing::info!("All migrations completed successfully");

    println!("✅ Database migrations applied");
    Ok(())
}
