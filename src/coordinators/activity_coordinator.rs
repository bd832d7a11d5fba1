use std::sync::Arc;

use async_trait::async_trait;

use crate::app_data::AppData;
use crate::authorization::{ActivityPolicy, Policy};
use crate::errors::CrmError;
use crate::providers::ReferenceProvider;
use crate::stores::ActivityStore;
use crate::types::db::activity;
use crate::types::dto::activity::{ActivityFilter, ActivityInput, DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT};
use crate::types::dto::{Page, PageLimits, PageRequest};
use crate::types::internal::context::RequestContext;
use crate::types::internal::ActivityEntry;

use super::ResourceCoordinator;

/// Manually logged activity plus the recent-activity feed
pub struct ActivityCoordinator {
    app_data: Arc<AppData>,
    activity_store: Arc<ActivityStore>,
    reference_provider: Arc<ReferenceProvider>,
    page_limits: PageLimits,
}

impl ActivityCoordinator {
    /// Create ActivityCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            activity_store: app_data.activity_store.clone(),
            reference_provider: app_data.providers.reference_provider.clone(),
            page_limits: app_data.page_limits,
            app_data,
        }
    }

    fn db(&self) -> &sea_orm::DatabaseConnection {
        &self.app_data.connections.crm
    }

    async fn find(&self, id: i64) -> Result<activity::Model, CrmError> {
        self.activity_store
            .find_by_id(self.db(), id)
            .await?
            .ok_or(CrmError::not_found("Activity", id))
    }

    async fn require_subject(&self, input: &ActivityInput) -> Result<(), CrmError> {
        if !self.reference_provider.subject_exists(self.db(), input.subject).await? {
            return Err(CrmError::not_found(input.subject.kind().label(), input.subject.id()));
        }
        Ok(())
    }

    /// Newest activities visible to the caller, `limit` clamped to 1..=50
    pub async fn recent(&self, ctx: &RequestContext, limit: Option<u64>) -> Result<Vec<activity::Model>, CrmError> {
        if !ActivityPolicy::can_view_any(ctx.user()) {
            return Err(CrmError::forbidden("view", "activities"));
        }
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, MAX_RECENT_LIMIT);
        Ok(self.activity_store.recent(self.db(), ctx.user(), limit).await?)
    }
}

#[async_trait]
impl ResourceCoordinator for ActivityCoordinator {
    type Record = activity::Model;
    type Filter = ActivityFilter;
    type Input = ActivityInput;

    async fn list(
        &self,
        ctx: &RequestContext,
        filter: &ActivityFilter,
        page: PageRequest,
    ) -> Result<Page<activity::Model>, CrmError> {
        if !ActivityPolicy::can_view_any(ctx.user()) {
            return Err(CrmError::forbidden("view", "activities"));
        }
        let (page, per_page) = page.resolve(&self.page_limits);
        Ok(self
            .activity_store
            .list(self.db(), ctx.user(), filter, page, per_page)
            .await?)
    }

    async fn get(&self, ctx: &RequestContext, id: i64) -> Result<activity::Model, CrmError> {
        let activity = self.find(id).await?;
        if !ActivityPolicy::can_view(ctx.user(), &activity) {
            return Err(CrmError::forbidden("view", "activities"));
        }
        Ok(activity)
    }

    /// Logs an activity authored by the caller
    async fn create(&self, ctx: &RequestContext, input: &ActivityInput) -> Result<activity::Model, CrmError> {
        if !ActivityPolicy::can_create(ctx.user()) {
            return Err(CrmError::forbidden("create", "activities"));
        }
        input.validate()?;
        self.require_subject(input).await?;

        let entry = ActivityEntry {
            kind: input.kind,
            user_id: ctx.user_id(),
            subject: input.subject,
            description: input.description.clone(),
            activity_date: input.activity_date,
        };
        let activity = self.activity_store.append(self.db(), entry).await?;
        tracing::info!(activity_id = activity.id, subject = %input.subject, "Activity logged");
        Ok(activity)
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: &ActivityInput,
    ) -> Result<activity::Model, CrmError> {
        let existing = self.find(id).await?;
        if !ActivityPolicy::can_update(ctx.user(), &existing) {
            return Err(CrmError::forbidden("update", "activities"));
        }
        input.validate()?;
        self.require_subject(input).await?;

        let activity = self.activity_store.update(self.db(), existing, input).await?;
        tracing::info!(activity_id = id, user_id = ctx.user_id(), "Activity updated");
        Ok(activity)
    }

    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), CrmError> {
        let activity = self.find(id).await?;
        if !ActivityPolicy::can_delete(ctx.user(), &activity) {
            return Err(CrmError::forbidden("delete", "activities"));
        }
        self.activity_store.delete(self.db(), activity).await?;
        tracing::info!(activity_id = id, user_id = ctx.user_id(), "Activity deleted");
        Ok(())
    }
}
