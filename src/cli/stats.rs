use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::DashboardCoordinator;
use crate::types::internal::context::RequestContext;

/// Print the dashboard stats visible to `user_id` as pretty JSON
pub async fn print_stats(app_data: Arc<AppData>, user_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let actor = app_data
        .providers
        .user_provider
        .authenticate(&app_data.connections.crm, user_id)
        .await?;
    let ctx = RequestContext::for_cli("stats", actor);

    let stats = DashboardCoordinator::new(app_data).stats(&ctx).await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
