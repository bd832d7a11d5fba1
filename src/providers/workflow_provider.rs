use std::sync::Arc;

use chrono::Utc;
use sea_orm::ConnectionTrait;

use crate::audit::ActivityLogger;
use crate::errors::InternalError;
use crate::stores::{ContactStore, DealStore, LeadStore, TaskStore};
use crate::types::db::{deal, deal_stage, lead, task};
use crate::types::dto::lead::LeadConversion;
use crate::types::internal::context::RequestContext;

/// Multi-step writes behind lead conversion, stage changes and task completion.
///
/// Callers check permissions and state first and pass the open transaction.
pub struct WorkflowProvider {
    lead_store: Arc<LeadStore>,
    contact_store: Arc<ContactStore>,
    deal_store: Arc<DealStore>,
    task_store: Arc<TaskStore>,
    activity_logger: Arc<ActivityLogger>,
}

impl WorkflowProvider {
    pub fn new(
        lead_store: Arc<LeadStore>,
        contact_store: Arc<ContactStore>,
        deal_store: Arc<DealStore>,
        task_store: Arc<TaskStore>,
        activity_logger: Arc<ActivityLogger>,
    ) -> Self {
        Self {
            lead_store,
            contact_store,
            deal_store,
            task_store,
            activity_logger,
        }
    }

    /// Inserts the contact, then links and stamps the lead
    pub async fn convert_lead(
        &self,
        txn: &impl ConnectionTrait,
        lead: lead::Model,
        company_id: Option<i64>,
        owner_id: i64,
    ) -> Result<LeadConversion, InternalError> {
        let contact = self
            .contact_store
            .create_from_lead(txn, &lead, company_id, owner_id)
            .await?;
        let lead = self
            .lead_store
            .mark_converted(txn, lead, contact.id, Utc::now())
            .await?;

        Ok(LeadConversion { contact, lead })
    }

    /// Moves the deal and appends the stage-change note
    pub async fn change_deal_stage(
        &self,
        txn: &impl ConnectionTrait,
        ctx: &RequestContext,
        deal: deal::Model,
        from: &deal_stage::Model,
        to: &deal_stage::Model,
    ) -> Result<deal::Model, InternalError> {
        let deal = self.deal_store.set_stage(txn, deal, to.id).await?;
        self.activity_logger
            .log_stage_change(txn, ctx, &deal, from, to)
            .await?;
        Ok(deal)
    }

    /// Re-completing a completed task stamps completed_at again
    pub async fn complete_task(
        &self,
        conn: &impl ConnectionTrait,
        task: task::Model,
    ) -> Result<task::Model, InternalError> {
        self.task_store.complete(conn, task, Utc::now()).await
    }
}
