// User management CLI commands

use crate::app_data::AppData;
use crate::config::DatabaseConnections;
use crate::types::dto::user::NewUser;

/// Create a user and assign roles in one transaction
pub async fn create_user(
    app_data: &AppData,
    name: String,
    email: String,
    roles: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = NewUser { name, email, roles };

    let txn = app_data.connections.begin_transaction().await?;
    let user = match app_data.providers.user_provider.create_user(&txn, &input).await {
        Ok(user) => user,
        Err(e) => {
            println!("❌ Error: {}", e);
            return Err(e.into());
        }
    };
    DatabaseConnections::commit_transaction(txn).await?;

    println!("✅ User created");
    println!("   ID:    {}", user.id);
    println!("   Name:  {}", user.name);
    println!("   Email: {}", user.email);
    if !input.roles.is_empty() {
        println!("   Roles: {}", input.roles.join(", "));
    }
    Ok(())
}

pub async fn assign_role(
    app_data: &AppData,
    user_id: i64,
    role: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let assigned = app_data
        .providers
        .user_provider
        .assign_role(&app_data.connections.crm, user_id, role)
        .await?;

    if assigned {
        println!("✅ Role '{}' assigned to user {}", role, user_id);
    } else {
        println!("ℹ️  User {} already has role '{}'", user_id, role);
    }
    Ok(())
}

pub async fn list_users(app_data: &AppData) -> Result<(), Box<dyn std::error::Error>> {
    let users = app_data
        .providers
        .user_provider
        .list_users(&app_data.connections.crm)
        .await?;

    if users.is_empty() {
        println!("ℹ️  No users found.");
        return Ok(());
    }

    for summary in users {
        let status = if summary.user.is_active { "active" } else { "inactive" };
        println!(
            "{:>4}  {:<24} {:<32} {:<8} {}",
            summary.user.id,
            summary.user.name,
            summary.user.email,
            status,
            summary.roles.join(", ")
        );
    }
    Ok(())
}

pub async fn deactivate_user(app_data: &AppData, user_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let user = app_data
        .providers
        .user_provider
        .deactivate(&app_data.connections.crm, user_id)
        .await?;

    println!("✅ User {} ({}) deactivated", user.id, user.email);
    Ok(())
}
