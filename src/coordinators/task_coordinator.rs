use std::sync::Arc;

use async_trait::async_trait;

use crate::app_data::AppData;
use crate::authorization::{Policy, TaskPolicy};
use crate::errors::{CrmError, ValidationErrors};
use crate::providers::{ReferenceProvider, WorkflowProvider};
use crate::stores::TaskStore;
use crate::types::db::task;
use crate::types::dto::task::{TaskFilter, TaskInput};
use crate::types::dto::{Page, PageLimits, PageRequest};
use crate::types::internal::context::RequestContext;

use super::ResourceCoordinator;

pub struct TaskCoordinator {
    app_data: Arc<AppData>,
    task_store: Arc<TaskStore>,
    reference_provider: Arc<ReferenceProvider>,
    workflow_provider: Arc<WorkflowProvider>,
    page_limits: PageLimits,
}

impl TaskCoordinator {
    /// Create TaskCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            task_store: app_data.task_store.clone(),
            reference_provider: app_data.providers.reference_provider.clone(),
            workflow_provider: app_data.providers.workflow_provider.clone(),
            page_limits: app_data.page_limits,
            app_data,
        }
    }

    fn db(&self) -> &sea_orm::DatabaseConnection {
        &self.app_data.connections.crm
    }

    async fn find(&self, id: i64) -> Result<task::Model, CrmError> {
        self.task_store
            .find_by_id(self.db(), id)
            .await?
            .ok_or(CrmError::not_found("Task", id))
    }

    async fn check_input(&self, input: &TaskInput, assigned_to_id: i64) -> Result<(), CrmError> {
        input.validate()?;

        let mut errors = ValidationErrors::new();
        self.reference_provider
            .check_user(self.db(), &mut errors, "assigned_to_id", assigned_to_id)
            .await?;
        self.reference_provider
            .check_subject(self.db(), &mut errors, "related_to", input.related_to)
            .await?;
        errors.into_result()
    }

    /// Marks the task Completed and stamps completed_at.
    ///
    /// Completing an already completed task stamps it again.
    pub async fn complete_task(&self, ctx: &RequestContext, task_id: i64) -> Result<task::Model, CrmError> {
        let task = self.find(task_id).await?;
        if !TaskPolicy::can_update(ctx.user(), &task) {
            return Err(CrmError::forbidden("update", "tasks"));
        }

        let task = self.workflow_provider.complete_task(self.db(), task).await?;
        tracing::info!(task_id, user_id = ctx.user_id(), "Task completed");
        Ok(task)
    }
}

#[async_trait]
impl ResourceCoordinator for TaskCoordinator {
    type Record = task::Model;
    type Filter = TaskFilter;
    type Input = TaskInput;

    async fn list(
        &self,
        ctx: &RequestContext,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> Result<Page<task::Model>, CrmError> {
        if !TaskPolicy::can_view_any(ctx.user()) {
            return Err(CrmError::forbidden("view", "tasks"));
        }
        let (page, per_page) = page.resolve(&self.page_limits);
        Ok(self
            .task_store
            .list(self.db(), ctx.user(), filter, page, per_page)
            .await?)
    }

    async fn get(&self, ctx: &RequestContext, id: i64) -> Result<task::Model, CrmError> {
        let task = self.find(id).await?;
        if !TaskPolicy::can_view(ctx.user(), &task) {
            return Err(CrmError::forbidden("view", "tasks"));
        }
        Ok(task)
    }

    async fn create(&self, ctx: &RequestContext, input: &TaskInput) -> Result<task::Model, CrmError> {
        if !TaskPolicy::can_create(ctx.user()) {
            return Err(CrmError::forbidden("create", "tasks"));
        }
        let assigned_to_id = input.assigned_to_id.unwrap_or_else(|| ctx.user_id());
        self.check_input(input, assigned_to_id).await?;

        let task = self.task_store.create(self.db(), input, assigned_to_id).await?;
        tracing::info!(task_id = task.id, related_to = %task.related_to(), "Task created");
        Ok(task)
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: &TaskInput,
    ) -> Result<task::Model, CrmError> {
        let existing = self.find(id).await?;
        if !TaskPolicy::can_update(ctx.user(), &existing) {
            return Err(CrmError::forbidden("update", "tasks"));
        }
        let assigned_to_id = input.assigned_to_id.unwrap_or(existing.assigned_to_id);
        self.check_input(input, assigned_to_id).await?;

        let task = self
            .task_store
            .update(self.db(), existing, input, assigned_to_id)
            .await?;
        tracing::info!(task_id = id, user_id = ctx.user_id(), "Task updated");
        Ok(task)
    }

    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), CrmError> {
        let task = self.find(id).await?;
        if !TaskPolicy::can_delete(ctx.user(), &task) {
            return Err(CrmError::forbidden("delete", "tasks"));
        }
        self.task_store.delete(self.db(), task).await?;
        tracing::info!(task_id = id, user_id = ctx.user_id(), "Task deleted");
        Ok(())
    }
}
