use std::sync::Arc;

use async_trait::async_trait;

use crate::app_data::AppData;
use crate::authorization::{Ability, LeadPolicy, Policy, Resource};
use crate::config::DatabaseConnections;
use crate::errors::{CrmError, ValidationErrors};
use crate::providers::{ReferenceProvider, WorkflowProvider};
use crate::stores::{ContactStore, LeadStore};
use crate::types::db::lead;
use crate::types::dto::lead::{ConvertLeadOverrides, LeadConversion, LeadFilter, LeadInput};
use crate::types::dto::{Page, PageLimits, PageRequest};
use crate::types::internal::context::RequestContext;

use super::{unique_conflict, ResourceCoordinator};

/// Lead CRUD, soft delete and conversion into a Contact
pub struct LeadCoordinator {
    app_data: Arc<AppData>,
    lead_store: Arc<LeadStore>,
    contact_store: Arc<ContactStore>,
    reference_provider: Arc<ReferenceProvider>,
    workflow_provider: Arc<WorkflowProvider>,
    page_limits: PageLimits,
}

impl LeadCoordinator {
    /// Create LeadCoordinator from AppData
    ///
    /// Follows the AppData pattern: takes Arc<AppData> as single parameter,
    /// extracts the stores and providers it needs.
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            lead_store: app_data.lead_store.clone(),
            contact_store: app_data.contact_store.clone(),
            reference_provider: app_data.providers.reference_provider.clone(),
            workflow_provider: app_data.providers.workflow_provider.clone(),
            page_limits: app_data.page_limits,
            app_data,
        }
    }

    fn db(&self) -> &sea_orm::DatabaseConnection {
        &self.app_data.connections.crm
    }

    /// Live lead or NotFound
    async fn find_live(&self, id: i64) -> Result<lead::Model, CrmError> {
        match self.lead_store.find_by_id(self.db(), id).await? {
            Some(lead) if !lead.is_trashed() => Ok(lead),
            _ => Err(CrmError::not_found("Lead", id)),
        }
    }

    /// Trashed leads are visible only to callers allowed to restore them
    async fn find_for_restore(&self, ctx: &RequestContext, id: i64) -> Result<lead::Model, CrmError> {
        let lead = self
            .lead_store
            .find_by_id(self.db(), id)
            .await?
            .ok_or(CrmError::not_found("Lead", id))?;
        if !LeadPolicy::can_restore(ctx.user(), &lead) {
            return Err(CrmError::forbidden("restore", "leads"));
        }
        Ok(lead)
    }

    async fn check_email(&self, email: &str, current: Option<i64>) -> Result<(), CrmError> {
        if let Some(other) = self.lead_store.find_by_email(self.db(), email).await? {
            if Some(other.id) != current {
                return Err(CrmError::conflict("email", email));
            }
        }
        Ok(())
    }

    /// Resolves the assignee, requiring `assign-leads` to hand the lead to someone else
    async fn resolve_assignee(
        &self,
        ctx: &RequestContext,
        requested: Option<i64>,
        current: Option<i64>,
    ) -> Result<Option<i64>, CrmError> {
        let assignee = requested.or(current);
        if assignee != current && !LeadPolicy::can_assign(ctx.user()) {
            return Err(CrmError::forbidden("assign", "leads"));
        }

        if let Some(user_id) = requested {
            let mut errors = ValidationErrors::new();
            self.reference_provider
                .check_user(self.db(), &mut errors, "assigned_to_id", user_id)
                .await?;
            errors.into_result()?;
        }
        Ok(assignee)
    }

    pub async fn restore(&self, ctx: &RequestContext, id: i64) -> Result<lead::Model, CrmError> {
        let lead = self.find_for_restore(ctx, id).await?;
        let lead = self.lead_store.restore(self.db(), lead).await?;
        tracing::info!(lead_id = id, user_id = ctx.user_id(), "Lead restored");
        Ok(lead)
    }

    pub async fn force_delete(&self, ctx: &RequestContext, id: i64) -> Result<(), CrmError> {
        let lead = self
            .lead_store
            .find_by_id(self.db(), id)
            .await?
            .ok_or(CrmError::not_found("Lead", id))?;
        if !LeadPolicy::can_force_delete(ctx.user(), &lead) {
            return Err(CrmError::forbidden("force delete", "leads"));
        }
        self.lead_store.force_delete(self.db(), lead).await?;
        tracing::info!(lead_id = id, user_id = ctx.user_id(), "Lead permanently deleted");
        Ok(())
    }

    /// Turns a lead into a Contact and marks it Converted, atomically.
    ///
    /// Not idempotent: a second call fails with AlreadyConverted.
    pub async fn convert_lead(
        &self,
        ctx: &RequestContext,
        lead_id: i64,
        overrides: ConvertLeadOverrides,
    ) -> Result<LeadConversion, CrmError> {
        let lead = self.find_live(lead_id).await?;
        if !LeadPolicy::can_convert(ctx.user(), &lead) {
            return Err(CrmError::forbidden("convert", "leads"));
        }
        if lead.is_converted() {
            return Err(CrmError::AlreadyConverted { lead_id });
        }

        let owner_id = overrides
            .owner_id
            .or(lead.assigned_to_id)
            .unwrap_or_else(|| ctx.user_id());

        let mut errors = ValidationErrors::new();
        if let Some(owner_id) = overrides.owner_id {
            self.reference_provider
                .check_user(self.db(), &mut errors, "owner_id", owner_id)
                .await?;
        }
        self.reference_provider
            .check_company(self.db(), &mut errors, "company_id", overrides.company_id)
            .await?;
        errors.into_result()?;

        if self.contact_store.find_by_email(self.db(), &lead.email).await?.is_some() {
            return Err(CrmError::conflict("email", lead.email));
        }

        let email = lead.email.clone();
        let txn = self.app_data.connections.begin_transaction().await?;
        let conversion = self
            .workflow_provider
            .convert_lead(&txn, lead, overrides.company_id, owner_id)
            .await
            .map_err(|e| unique_conflict(e, "email", &email))?;
        DatabaseConnections::commit_transaction(txn).await?;

        tracing::info!(
            lead_id,
            contact_id = conversion.contact.id,
            user_id = ctx.user_id(),
            "Lead converted"
        );
        Ok(conversion)
    }
}

#[async_trait]
impl ResourceCoordinator for LeadCoordinator {
    type Record = lead::Model;
    type Filter = LeadFilter;
    type Input = LeadInput;

    async fn list(
        &self,
        ctx: &RequestContext,
        filter: &LeadFilter,
        page: PageRequest,
    ) -> Result<Page<lead::Model>, CrmError> {
        if !LeadPolicy::can_view_any(ctx.user()) {
            return Err(CrmError::forbidden("view", "leads"));
        }
        if filter.with_trashed && !ctx.user().can(Ability::DeleteAll, Resource::Leads) {
            return Err(CrmError::forbidden("view trashed", "leads"));
        }

        let (page, per_page) = page.resolve(&self.page_limits);
        Ok(self
            .lead_store
            .list(self.db(), ctx.user(), filter, page, per_page)
            .await?)
    }

    async fn get(&self, ctx: &RequestContext, id: i64) -> Result<lead::Model, CrmError> {
        let lead = self
            .lead_store
            .find_by_id(self.db(), id)
            .await?
            .ok_or(CrmError::not_found("Lead", id))?;
        if lead.is_trashed() && !ctx.user().can(Ability::DeleteAll, Resource::Leads) {
            return Err(CrmError::not_found("Lead", id));
        }
        if !LeadPolicy::can_view(ctx.user(), &lead) {
            return Err(CrmError::forbidden("view", "leads"));
        }
        Ok(lead)
    }

    async fn create(&self, ctx: &RequestContext, input: &LeadInput) -> Result<lead::Model, CrmError> {
        if !LeadPolicy::can_create(ctx.user()) {
            return Err(CrmError::forbidden("create", "leads"));
        }
        input.validate()?;

        let assignee = self
            .resolve_assignee(ctx, input.assigned_to_id, Some(ctx.user_id()))
            .await?;
        self.check_email(&input.email, None).await?;

        let lead = self
            .lead_store
            .create(self.db(), input, assignee)
            .await
            .map_err(|e| unique_conflict(e, "email", &input.email))?;
        tracing::info!(lead_id = lead.id, user_id = ctx.user_id(), "Lead created");
        Ok(lead)
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: &LeadInput,
    ) -> Result<lead::Model, CrmError> {
        let existing = self.find_live(id).await?;
        if !LeadPolicy::can_update(ctx.user(), &existing) {
            return Err(CrmError::forbidden("update", "leads"));
        }
        input.validate()?;
        if existing.is_converted() && input.status.is_some() {
            return Err(CrmError::invalid(
                "status",
                "The status of a converted lead cannot be changed.",
            ));
        }

        let assignee = self
            .resolve_assignee(ctx, input.assigned_to_id, existing.assigned_to_id)
            .await?;
        self.check_email(&input.email, Some(existing.id)).await?;

        let lead = self
            .lead_store
            .update(self.db(), existing, input, assignee)
            .await
            .map_err(|e| unique_conflict(e, "email", &input.email))?;
        tracing::info!(lead_id = id, user_id = ctx.user_id(), "Lead updated");
        Ok(lead)
    }

    /// Soft delete; the row stays restorable
    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), CrmError> {
        let lead = self.find_live(id).await?;
        if !LeadPolicy::can_delete(ctx.user(), &lead) {
            return Err(CrmError::forbidden("delete", "leads"));
        }
        self.lead_store.soft_delete(self.db(), lead).await?;
        tracing::info!(lead_id = id, user_id = ctx.user_id(), "Lead moved to trash");
        Ok(())
    }
}
