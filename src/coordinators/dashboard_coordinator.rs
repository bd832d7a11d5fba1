use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::CrmError;
use crate::stores::{CompanyStore, ContactStore, DealStore, LeadStore, TaskStore};
use crate::types::dto::dashboard::DashboardStats;
use crate::types::internal::context::RequestContext;

/// Headline counts, each scoped like the matching listing
pub struct DashboardCoordinator {
    app_data: Arc<AppData>,
    lead_store: Arc<LeadStore>,
    contact_store: Arc<ContactStore>,
    company_store: Arc<CompanyStore>,
    deal_store: Arc<DealStore>,
    task_store: Arc<TaskStore>,
}

impl DashboardCoordinator {
    /// Create DashboardCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            lead_store: app_data.lead_store.clone(),
            contact_store: app_data.contact_store.clone(),
            company_store: app_data.company_store.clone(),
            deal_store: app_data.deal_store.clone(),
            task_store: app_data.task_store.clone(),
            app_data,
        }
    }

    pub async fn stats(&self, ctx: &RequestContext) -> Result<DashboardStats, CrmError> {
        let db = &self.app_data.connections.crm;
        let user = ctx.user();

        let stats = DashboardStats {
            leads: self.lead_store.stats(db, user).await?,
            contacts: self.contact_store.count_visible(db, user).await?,
            companies: self.company_store.count_visible(db, user).await?,
            deals: self.deal_store.stats(db, user).await?,
            tasks: self.task_store.stats(db, user).await?,
        };

        tracing::debug!(user_id = user.id, "Dashboard stats computed");
        Ok(stats)
    }
}
