// CLI module for operator tasks run against the CRM database

pub mod migrate;
pub mod seed;
pub mod stats;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// CRM core operator CLI
#[derive(Parser)]
#[command(name = "crm")]
#[command(about = "CRM core operator CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Install permissions, default roles and deal stages
    Seed,

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Print dashboard stats as JSON, as seen by one user
    Stats {
        #[arg(long)]
        user_id: i64,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user, optionally with roles
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Role name, repeatable
        #[arg(long = "role")]
        roles: Vec<String>,
    },

    /// Assign an existing role to a user
    AssignRole {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        role: String,
    },

    /// List users with their roles
    List,

    /// Deactivate a user
    Deactivate {
        #[arg(long)]
        user_id: i64,
    },
}

/// Execute CLI command
///
/// Routes the parsed CLI command to the appropriate handler function.
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `app_data` - Application data containing all stores and providers
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(
    cli: Cli,
    app_data: Arc<AppData>,
) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => migrate::run_migrations(&app_data).await?,
        Commands::Seed => seed::run_seed(&app_data).await?,
        Commands::User(user_cmd) => match user_cmd {
            UserCommands::Create { name, email, roles } => {
                user::create_user(&app_data, name, email, roles).await?;
            }
            UserCommands::AssignRole { user_id, role } => {
                user::assign_role(&app_data, user_id, &role).await?;
            }
            UserCommands::List => user::list_users(&app_data).await?,
            UserCommands::Deactivate { user_id } => user::deactivate_user(&app_data, user_id).await?,
        },
        Commands::Stats { user_id } => stats::print_stats(app_data, user_id).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_repeated_roles() {
        let cli = Cli::parse_from([
            "crm", "user", "create", "--name", "Ada", "--email", "ada@example.com", "--role", "Manager",
            "--role", "Sales Rep",
        ]);

        match cli.command {
            Commands::User(UserCommands::Create { roles, .. }) => {
                assert_eq!(roles, vec!["Manager".to_string(), "Sales Rep".to_string()]);
            }
            _ => panic!("expected user create"),
        }
    }

    #[test]
    fn test_parses_stats_user_id() {
        let cli = Cli::parse_from(["crm", "stats", "--user-id", "7"]);
        assert!(matches!(cli.command, Commands::Stats { user_id: 7 }));
    }

    #[test]
    fn test_parses_assign_role() {
        let cli = Cli::parse_from(["crm", "user", "assign-role", "--user-id", "3", "--role", "Admin"]);
        match cli.command {
            Commands::User(UserCommands::AssignRole { user_id, role }) => {
                assert_eq!(user_id, 3);
                assert_eq!(role, "Admin");
            }
            _ => panic!("expected user assign-role"),
        }
    }
}
