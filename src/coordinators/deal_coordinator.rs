use std::sync::Arc;

use async_trait::async_trait;

use crate::app_data::AppData;
use crate::authorization::{Ability, DealPolicy, Policy, Resource};
use crate::config::DatabaseConnections;
use crate::errors::{CrmError, ValidationErrors};
use crate::providers::{ReferenceProvider, WorkflowProvider};
use crate::stores::{DealStageStore, DealStore};
use crate::types::db::{deal, deal_stage};
use crate::types::dto::deal::{DealFigures, DealFilter, DealInput, DealSummary};
use crate::types::dto::{Page, PageLimits, PageRequest};
use crate::types::internal::context::RequestContext;

use super::ResourceCoordinator;

/// Deal CRUD, soft delete and pipeline stage changes
pub struct DealCoordinator {
    app_data: Arc<AppData>,
    deal_store: Arc<DealStore>,
    deal_stage_store: Arc<DealStageStore>,
    reference_provider: Arc<ReferenceProvider>,
    workflow_provider: Arc<WorkflowProvider>,
    page_limits: PageLimits,
}

impl DealCoordinator {
    /// Create DealCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            deal_store: app_data.deal_store.clone(),
            deal_stage_store: app_data.deal_stage_store.clone(),
            reference_provider: app_data.providers.reference_provider.clone(),
            workflow_provider: app_data.providers.workflow_provider.clone(),
            page_limits: app_data.page_limits,
            app_data,
        }
    }

    fn db(&self) -> &sea_orm::DatabaseConnection {
        &self.app_data.connections.crm
    }

    async fn find_live(&self, id: i64) -> Result<deal::Model, CrmError> {
        match self.deal_store.find_by_id(self.db(), id).await? {
            Some(deal) if !deal.is_trashed() => Ok(deal),
            _ => Err(CrmError::not_found("Deal", id)),
        }
    }

    async fn find_any(&self, id: i64) -> Result<deal::Model, CrmError> {
        self.deal_store
            .find_by_id(self.db(), id)
            .await?
            .ok_or(CrmError::not_found("Deal", id))
    }

    async fn check_input(&self, input: &DealInput, assigned_to_id: i64) -> Result<DealFigures, CrmError> {
        let figures = input.validate()?;

        let mut errors = ValidationErrors::new();
        self.reference_provider
            .check_contact(self.db(), &mut errors, "contact_id", input.contact_id)
            .await?;
        self.reference_provider
            .check_stage(self.db(), &mut errors, "deal_stage_id", input.deal_stage_id)
            .await?;
        self.reference_provider
            .check_user(self.db(), &mut errors, "assigned_to_id", assigned_to_id)
            .await?;
        errors.into_result()?;

        Ok(figures)
    }

    /// Pipeline stages in display order
    pub async fn stages(&self) -> Result<Vec<deal_stage::Model>, CrmError> {
        Ok(self.deal_stage_store.list(self.db()).await?)
    }

    /// Moves a deal to another stage and logs the transition in one transaction.
    ///
    /// Moving to the current stage still appends a note.
    pub async fn update_deal_stage(
        &self,
        ctx: &RequestContext,
        deal_id: i64,
        stage_id: i64,
    ) -> Result<DealSummary, CrmError> {
        let deal = self.find_live(deal_id).await?;
        if !DealPolicy::can_update(ctx.user(), &deal) {
            return Err(CrmError::forbidden("update", "deals"));
        }

        let to = self
            .deal_stage_store
            .find_by_id(self.db(), stage_id)
            .await?
            .ok_or(CrmError::not_found("DealStage", stage_id))?;
        let from = self
            .deal_stage_store
            .find_by_id(self.db(), deal.deal_stage_id)
            .await?
            .ok_or(CrmError::not_found("DealStage", deal.deal_stage_id))?;

        let txn = self.app_data.connections.begin_transaction().await?;
        let deal = self
            .workflow_provider
            .change_deal_stage(&txn, ctx, deal, &from, &to)
            .await?;
        DatabaseConnections::commit_transaction(txn).await?;

        tracing::info!(
            deal_id,
            from = %from.name,
            to = %to.name,
            user_id = ctx.user_id(),
            "Deal stage changed"
        );
        Ok(deal.into())
    }

    pub async fn restore(&self, ctx: &RequestContext, id: i64) -> Result<DealSummary, CrmError> {
        let deal = self.find_any(id).await?;
        if !DealPolicy::can_restore(ctx.user(), &deal) {
            return Err(CrmError::forbidden("restore", "deals"));
        }
        let deal = self.deal_store.restore(self.db(), deal).await?;
        tracing::info!(deal_id = id, user_id = ctx.user_id(), "Deal restored");
        Ok(deal.into())
    }

    pub async fn force_delete(&self, ctx: &RequestContext, id: i64) -> Result<(), CrmError> {
        let deal = self.find_any(id).await?;
        if !DealPolicy::can_force_delete(ctx.user(), &deal) {
            return Err(CrmError::forbidden("force delete", "deals"));
        }
        self.deal_store.force_delete(self.db(), deal).await?;
        tracing::info!(deal_id = id, user_id = ctx.user_id(), "Deal permanently deleted");
        Ok(())
    }
}

#[async_trait]
impl ResourceCoordinator for DealCoordinator {
    type Record = DealSummary;
    type Filter = DealFilter;
    type Input = DealInput;

    async fn list(
        &self,
        ctx: &RequestContext,
        filter: &DealFilter,
        page: PageRequest,
    ) -> Result<Page<DealSummary>, CrmError> {
        if !DealPolicy::can_view_any(ctx.user()) {
            return Err(CrmError::forbidden("view", "deals"));
        }
        if filter.with_trashed && !ctx.user().can(Ability::DeleteAll, Resource::Deals) {
            return Err(CrmError::forbidden("view trashed", "deals"));
        }

        let (page, per_page) = page.resolve(&self.page_limits);
        let deals = self
            .deal_store
            .list(self.db(), ctx.user(), filter, page, per_page)
            .await?;
        Ok(deals.map(DealSummary::from))
    }

    async fn get(&self, ctx: &RequestContext, id: i64) -> Result<DealSummary, CrmError> {
        let deal = self.find_any(id).await?;
        if deal.is_trashed() && !ctx.user().can(Ability::DeleteAll, Resource::Deals) {
            return Err(CrmError::not_found("Deal", id));
        }
        if !DealPolicy::can_view(ctx.user(), &deal) {
            return Err(CrmError::forbidden("view", "deals"));
        }
        Ok(deal.into())
    }

    async fn create(&self, ctx: &RequestContext, input: &DealInput) -> Result<DealSummary, CrmError> {
        if !DealPolicy::can_create(ctx.user()) {
            return Err(CrmError::forbidden("create", "deals"));
        }
        let assigned_to_id = input.assigned_to_id.unwrap_or_else(|| ctx.user_id());
        let figures = self.check_input(input, assigned_to_id).await?;

        let deal = self
            .deal_store
            .create(self.db(), input, figures, assigned_to_id)
            .await?;
        tracing::info!(deal_id = deal.id, user_id = ctx.user_id(), "Deal created");
        Ok(deal.into())
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: &DealInput,
    ) -> Result<DealSummary, CrmError> {
        let existing = self.find_live(id).await?;
        if !DealPolicy::can_update(ctx.user(), &existing) {
            return Err(CrmError::forbidden("update", "deals"));
        }
        let assigned_to_id = input.assigned_to_id.unwrap_or(existing.assigned_to_id);
        let figures = self.check_input(input, assigned_to_id).await?;

        let deal = self
            .deal_store
            .update(self.db(), existing, input, figures, assigned_to_id)
            .await?;
        tracing::info!(deal_id = id, user_id = ctx.user_id(), "Deal updated");
        Ok(deal.into())
    }

    /// Soft delete; the row stays restorable
    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), CrmError> {
        let deal = self.find_live(id).await?;
        if !DealPolicy::can_delete(ctx.user(), &deal) {
            return Err(CrmError::forbidden("delete", "deals"));
        }
        self.deal_store.soft_delete(self.db(), deal).await?;
        tracing::info!(deal_id = id, user_id = ctx.user_id(), "Deal moved to trash");
        Ok(())
    }
}
