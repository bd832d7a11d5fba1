use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::authorization::permissions::{catalogue, ASSIGN_LEADS, CONVERT_LEADS};
use crate::authorization::{Ability, Resource};
use crate::errors::InternalError;
use crate::stores::deal_stage_store::PIPELINE;
use crate::stores::{AuthorizationStore, DealStageStore};

pub const SUPER_ADMIN: &str = "Super Admin";
pub const ADMIN: &str = "Admin";
pub const MANAGER: &str = "Manager";
pub const SALES_REP: &str = "Sales Rep";

/// Record types managed through the uniform permission shape, activities excluded
const RECORDS: [Resource; 5] = [
    Resource::Leads,
    Resource::Contacts,
    Resource::Companies,
    Resource::Deals,
    Resource::Tasks,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub permissions: usize,
    pub roles: usize,
    pub stages: usize,
}

/// Installs the permission catalogue, the default roles and the deal pipeline
pub struct SeedProvider {
    authorization_store: Arc<AuthorizationStore>,
    deal_stage_store: Arc<DealStageStore>,
}

impl SeedProvider {
    pub fn new(authorization_store: Arc<AuthorizationStore>, deal_stage_store: Arc<DealStageStore>) -> Self {
        Self {
            authorization_store,
            deal_stage_store,
        }
    }

    /// Safe to run repeatedly: existing rows are reused, grants are only added
    pub async fn seed(&self, conn: &impl ConnectionTrait) -> Result<SeedSummary, InternalError> {
        let mut summary = SeedSummary::default();

        let mut permission_ids = Vec::new();
        for name in catalogue() {
            let permission = self.authorization_store.ensure_permission(conn, &name).await?;
            permission_ids.push((name, permission.id));
        }
        summary.permissions = permission_ids.len();

        for (role_name, granted) in default_roles() {
            let role = self.authorization_store.ensure_role(conn, role_name).await?;
            for (name, permission_id) in &permission_ids {
                if granted.contains(name) {
                    self.authorization_store.grant(conn, role.id, *permission_id).await?;
                }
            }
            tracing::debug!(role = role_name, permissions = granted.len(), "Seeded role");
            summary.roles += 1;
        }

        for (name, position, color) in PIPELINE {
            self.deal_stage_store.ensure(conn, name, position, color).await?;
            summary.stages += 1;
        }

        tracing::info!(
            permissions = summary.permissions,
            roles = summary.roles,
            stages = summary.stages,
            "Seed complete"
        );
        Ok(summary)
    }
}

/// Default roles with the permission names each one receives
pub fn default_roles() -> Vec<(&'static str, Vec<String>)> {
    let everything = catalogue();

    let mut manager = grants(
        &RECORDS,
        &[
            Ability::View,
            Ability::ViewAll,
            Ability::Create,
            Ability::Edit,
            Ability::EditAll,
            Ability::Delete,
        ],
    );
    manager.extend([ASSIGN_LEADS, CONVERT_LEADS].map(String::from));
    manager.extend(grants(
        &[Resource::Activities],
        &[Ability::View, Ability::ViewAll, Ability::Create, Ability::Delete],
    ));

    let mut sales_rep = grants(
        &RECORDS,
        &[Ability::View, Ability::ViewAll, Ability::Create, Ability::Edit],
    );
    sales_rep.push(CONVERT_LEADS.to_string());
    sales_rep.extend(grants(
        &[Resource::Activities],
        &[Ability::View, Ability::ViewAll, Ability::Create],
    ));

    vec![
        (SUPER_ADMIN, everything.clone()),
        (ADMIN, everything),
        (MANAGER, manager),
        (SALES_REP, sales_rep),
    ]
}

fn grants(resources: &[Resource], abilities: &[Ability]) -> Vec<String> {
    resources
        .iter()
        .flat_map(|resource| abilities.iter().map(move |ability| ability.permission_for(*resource)))
        .collect()
}
