use migration::{CrmMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::config::BootstrapSettings;
use crate::errors::InternalError;

/// Connection to the CRM database
pub struct DatabaseConnections {
    pub crm: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connects using `DATABASE_URL`
    ///
    /// Does NOT run migrations - call `migrate()` separately.
    pub async fn connect(bootstrap_settings: &BootstrapSettings) -> Result<Self, InternalError> {
        Self::connect_url(bootstrap_settings.database_url()).await
    }

    pub async fn connect_url(database_url: &str) -> Result<Self, InternalError> {
        let crm = Database::connect(database_url)
            .await
            .map_err(|e| InternalError::database("connect_database", e))?;

        tracing::debug!("Connected to CRM database");

        Ok(Self { crm })
    }

    /// Runs all pending migrations
    pub async fn migrate(&self) -> Result<(), InternalError> {
        CrmMigrator::up(&self.crm, None)
            .await
            .map_err(|e| InternalError::database("run_migrations", e))?;

        tracing::debug!("CRM database migrations completed");

        Ok(())
    }

    /// Starts a transaction. Dropping it without commit rolls back.
    pub async fn begin_transaction(&self) -> Result<DatabaseTransaction, InternalError> {
        self.crm.begin().await.map_err(InternalError::transaction_begin)
    }

    pub async fn commit_transaction(txn: DatabaseTransaction) -> Result<(), InternalError> {
        txn.commit().await.map_err(InternalError::transaction_commit)
    }
}
