pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_access_control;
mod m20250301_000002_create_crm_tables;
mod m20250301_000003_create_activities;

pub struct CrmMigrator;

#[async_trait::async_trait]
impl MigratorTrait for CrmMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_access_control::Migration),
            Box::new(m20250301_000002_create_crm_tables::Migration),
            Box::new(m20250301_000003_create_activities::Migration),
        ]
    }
}
