use std::sync::Arc;

use async_trait::async_trait;

use crate::app_data::AppData;
use crate::authorization::{CompanyPolicy, Policy};
use crate::errors::{CrmError, ValidationErrors};
use crate::providers::ReferenceProvider;
use crate::stores::CompanyStore;
use crate::types::db::company;
use crate::types::dto::company::{CompanyFilter, CompanyInput};
use crate::types::dto::{Page, PageLimits, PageRequest};
use crate::types::internal::context::RequestContext;

use super::ResourceCoordinator;

pub struct CompanyCoordinator {
    app_data: Arc<AppData>,
    company_store: Arc<CompanyStore>,
    reference_provider: Arc<ReferenceProvider>,
    page_limits: PageLimits,
}

impl CompanyCoordinator {
    /// Create CompanyCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            company_store: app_data.company_store.clone(),
            reference_provider: app_data.providers.reference_provider.clone(),
            page_limits: app_data.page_limits,
            app_data,
        }
    }

    fn db(&self) -> &sea_orm::DatabaseConnection {
        &self.app_data.connections.crm
    }

    async fn find(&self, id: i64) -> Result<company::Model, CrmError> {
        self.company_store
            .find_by_id(self.db(), id)
            .await?
            .ok_or(CrmError::not_found("Company", id))
    }

    async fn check_owner(&self, owner_id: i64) -> Result<(), CrmError> {
        let mut errors = ValidationErrors::new();
        self.reference_provider
            .check_user(self.db(), &mut errors, "owner_id", owner_id)
            .await?;
        errors.into_result()
    }
}

#[async_trait]
impl ResourceCoordinator for CompanyCoordinator {
    type Record = company::Model;
    type Filter = CompanyFilter;
    type Input = CompanyInput;

    async fn list(
        &self,
        ctx: &RequestContext,
        filter: &CompanyFilter,
        page: PageRequest,
    ) -> Result<Page<company::Model>, CrmError> {
        if !CompanyPolicy::can_view_any(ctx.user()) {
            return Err(CrmError::forbidden("view", "companies"));
        }
        let (page, per_page) = page.resolve(&self.page_limits);
        Ok(self
            .company_store
            .list(self.db(), ctx.user(), filter, page, per_page)
            .await?)
    }

    async fn get(&self, ctx: &RequestContext, id: i64) -> Result<company::Model, CrmError> {
        let company = self.find(id).await?;
        if !CompanyPolicy::can_view(ctx.user(), &company) {
            return Err(CrmError::forbidden("view", "companies"));
        }
        Ok(company)
    }

    async fn create(&self, ctx: &RequestContext, input: &CompanyInput) -> Result<company::Model, CrmError> {
        if !CompanyPolicy::can_create(ctx.user()) {
            return Err(CrmError::forbidden("create", "companies"));
        }
        input.validate()?;
        let owner_id = input.owner_id.unwrap_or_else(|| ctx.user_id());
        self.check_owner(owner_id).await?;

        let company = self.company_store.create(self.db(), input, owner_id).await?;
        tracing::info!(company_id = company.id, user_id = ctx.user_id(), "Company created");
        Ok(company)
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: &CompanyInput,
    ) -> Result<company::Model, CrmError> {
        let existing = self.find(id).await?;
        if !CompanyPolicy::can_update(ctx.user(), &existing) {
            return Err(CrmError::forbidden("update", "companies"));
        }
        input.validate()?;
        let owner_id = input.owner_id.unwrap_or(existing.owner_id);
        self.check_owner(owner_id).await?;

        let company = self
            .company_store
            .update(self.db(), existing, input, owner_id)
            .await?;
        tracing::info!(company_id = id, user_id = ctx.user_id(), "Company updated");
        Ok(company)
    }

    /// Contacts of a deleted company keep existing with no company
    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), CrmError> {
        let company = self.find(id).await?;
        if !CompanyPolicy::can_delete(ctx.user(), &company) {
            return Err(CrmError::forbidden("delete", "companies"));
        }
        self.company_store.delete(self.db(), company).await?;
        tracing::info!(company_id = id, user_id = ctx.user_id(), "Company deleted");
        Ok(())
    }
}
