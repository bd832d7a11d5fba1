use crate::app_data::AppData;

/// Install the permission catalogue, default roles and deal pipeline
///
/// Safe to run repeatedly.
pub async fn run_seed(app_data: &AppData) -> Result<(), Box<dyn std::error::Error>> {
    let summary = app_data
        .providers
        .seed_provider
        .seed(&app_data.connections.crm)
        .await?;

    println!("✅ Seed complete");
    println!("   Permissions: {}", summary.permissions);
    println!("   Roles:       {}", summary.roles);
    println!("   Deal stages: {}", summary.stages);
    Ok(())
}
