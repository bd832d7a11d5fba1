use std::sync::Arc;

use async_trait::async_trait;

use crate::app_data::AppData;
use crate::authorization::{ContactPolicy, Policy};
use crate::errors::{CrmError, ValidationErrors};
use crate::providers::ReferenceProvider;
use crate::stores::{ContactStore, LeadStore};
use crate::types::db::contact;
use crate::types::dto::contact::{ContactFilter, ContactInput};
use crate::types::dto::{Page, PageLimits, PageRequest};
use crate::types::internal::context::RequestContext;

use super::{unique_conflict, ResourceCoordinator};

pub struct ContactCoordinator {
    app_data: Arc<AppData>,
    contact_store: Arc<ContactStore>,
    lead_store: Arc<LeadStore>,
    reference_provider: Arc<ReferenceProvider>,
    page_limits: PageLimits,
}

impl ContactCoordinator {
    /// Create ContactCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            contact_store: app_data.contact_store.clone(),
            lead_store: app_data.lead_store.clone(),
            reference_provider: app_data.providers.reference_provider.clone(),
            page_limits: app_data.page_limits,
            app_data,
        }
    }

    fn db(&self) -> &sea_orm::DatabaseConnection {
        &self.app_data.connections.crm
    }

    async fn find(&self, id: i64) -> Result<contact::Model, CrmError> {
        self.contact_store
            .find_by_id(self.db(), id)
            .await?
            .ok_or(CrmError::not_found("Contact", id))
    }

    /// Input validation plus reference and uniqueness checks
    async fn check_input(
        &self,
        input: &ContactInput,
        owner_id: i64,
        current: Option<i64>,
    ) -> Result<(), CrmError> {
        input.validate()?;

        let mut errors = ValidationErrors::new();
        self.reference_provider
            .check_user(self.db(), &mut errors, "owner_id", owner_id)
            .await?;
        self.reference_provider
            .check_company(self.db(), &mut errors, "company_id", input.company_id)
            .await?;
        errors.into_result()?;

        if let Some(other) = self.contact_store.find_by_email(self.db(), &input.email).await? {
            if Some(other.id) != current {
                return Err(CrmError::conflict("email", &input.email));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceCoordinator for ContactCoordinator {
    type Record = contact::Model;
    type Filter = ContactFilter;
    type Input = ContactInput;

    async fn list(
        &self,
        ctx: &RequestContext,
        filter: &ContactFilter,
        page: PageRequest,
    ) -> Result<Page<contact::Model>, CrmError> {
        if !ContactPolicy::can_view_any(ctx.user()) {
            return Err(CrmError::forbidden("view", "contacts"));
        }
        let (page, per_page) = page.resolve(&self.page_limits);
        Ok(self
            .contact_store
            .list(self.db(), ctx.user(), filter, page, per_page)
            .await?)
    }

    async fn get(&self, ctx: &RequestContext, id: i64) -> Result<contact::Model, CrmError> {
        let contact = self.find(id).await?;
        if !ContactPolicy::can_view(ctx.user(), &contact) {
            return Err(CrmError::forbidden("view", "contacts"));
        }
        Ok(contact)
    }

    async fn create(&self, ctx: &RequestContext, input: &ContactInput) -> Result<contact::Model, CrmError> {
        if !ContactPolicy::can_create(ctx.user()) {
            return Err(CrmError::forbidden("create", "contacts"));
        }
        let owner_id = input.owner_id.unwrap_or_else(|| ctx.user_id());
        self.check_input(input, owner_id, None).await?;

        let contact = self
            .contact_store
            .create(self.db(), input, owner_id)
            .await
            .map_err(|e| unique_conflict(e, "email", &input.email))?;
        tracing::info!(contact_id = contact.id, user_id = ctx.user_id(), "Contact created");
        Ok(contact)
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: &ContactInput,
    ) -> Result<contact::Model, CrmError> {
        let existing = self.find(id).await?;
        if !ContactPolicy::can_update(ctx.user(), &existing) {
            return Err(CrmError::forbidden("update", "contacts"));
        }
        let owner_id = input.owner_id.unwrap_or(existing.owner_id);
        self.check_input(input, owner_id, Some(existing.id)).await?;

        let contact = self
            .contact_store
            .update(self.db(), existing, input, owner_id)
            .await
            .map_err(|e| unique_conflict(e, "email", &input.email))?;
        tracing::info!(contact_id = id, user_id = ctx.user_id(), "Contact updated");
        Ok(contact)
    }

    /// Hard delete, cascading to the contact's deals. A contact a lead was converted into is kept.
    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), CrmError> {
        let contact = self.find(id).await?;
        if !ContactPolicy::can_delete(ctx.user(), &contact) {
            return Err(CrmError::forbidden("delete", "contacts"));
        }
        if let Some(lead) = self.lead_store.find_converted_into(self.db(), id).await? {
            tracing::debug!(contact_id = id, lead_id = lead.id, "Contact is referenced by a converted lead");
            return Err(CrmError::conflict("contact", id.to_string()));
        }
        self.contact_store.delete(self.db(), contact).await?;
        tracing::info!(contact_id = id, user_id = ctx.user_id(), "Contact deleted");
        Ok(())
    }
}
