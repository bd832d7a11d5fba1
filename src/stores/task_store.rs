use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::authorization::{scope_filter, text_search};
use crate::errors::InternalError;
use crate::stores::fetch_page;
use crate::types::db::task::{self, TaskPriority, TaskStatus};
use crate::types::dto::dashboard::TaskStats;
use crate::types::dto::task::{TaskFilter, TaskInput};
use crate::types::dto::Page;
use crate::types::internal::AuthenticatedUser;

const SEARCH_COLUMNS: [task::Column; 2] = [task::Column::Title, task::Column::Description];

pub struct TaskStore {}

impl TaskStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
    ) -> Result<Option<task::Model>, InternalError> {
        task::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_task", e))
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        filter: &TaskFilter,
        page: u64,
        per_page: u64,
    ) -> Result<Page<task::Model>, InternalError> {
        let mut query = scope_filter(user, task::Entity::find());

        if let Some(status) = filter.status {
            query = query.filter(task::Column::Status.eq(status));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(task::Column::Priority.eq(priority));
        }
        if let Some(day) = filter.due_date {
            let (start, end) = day_bounds(day);
            query = query
                .filter(task::Column::DueDate.gte(start))
                .filter(task::Column::DueDate.lt(end));
        }
        if filter.overdue {
            query = overdue(query, Utc::now());
        }
        if let Some(assigned_to_id) = filter.assigned_to_id {
            query = query.filter(task::Column::AssignedToId.eq(assigned_to_id));
        }
        if let Some(condition) = filter
            .search
            .as_deref()
            .and_then(|term| text_search(&SEARCH_COLUMNS, term))
        {
            query = query.filter(condition);
        }

        let query = query
            .order_by_desc(task::Column::CreatedAt)
            .order_by_desc(task::Column::Id);
        fetch_page(conn, query, page, per_page, "list_tasks").await
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        input: &TaskInput,
        assigned_to_id: i64,
    ) -> Result<task::Model, InternalError> {
        let now = Utc::now();
        let status = input.status.unwrap_or(TaskStatus::Pending);
        let task = task::ActiveModel {
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            due_date: Set(input.due_date),
            status: Set(status),
            priority: Set(input.priority.unwrap_or(TaskPriority::Medium)),
            assigned_to_id: Set(assigned_to_id),
            related_to_type: Set(input.related_to.kind()),
            related_to_id: Set(input.related_to.id()),
            completed_at: Set((status == TaskStatus::Completed).then_some(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let task = task
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_task", e))?;
        tracing::debug!(task_id = task.id, "Inserted task");
        Ok(task)
    }

    /// Replaces the editable fields. completed_at follows status transitions into and out of Completed.
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: task::Model,
        input: &TaskInput,
        assigned_to_id: i64,
    ) -> Result<task::Model, InternalError> {
        let now = Utc::now();
        let status = input.status.unwrap_or(existing.status);
        let completed_at = match (existing.status, status) {
            (_, TaskStatus::Pending | TaskStatus::InProgress) => None,
            (TaskStatus::Completed, TaskStatus::Completed) => existing.completed_at,
            (_, TaskStatus::Completed) => Some(now),
        };

        let mut task: task::ActiveModel = existing.into();
        task.title = Set(input.title.clone());
        task.description = Set(input.description.clone());
        task.due_date = Set(input.due_date);
        task.status = Set(status);
        task.priority = Set(input.priority.unwrap_or(TaskPriority::Medium));
        task.assigned_to_id = Set(assigned_to_id);
        task.related_to_type = Set(input.related_to.kind());
        task.related_to_id = Set(input.related_to.id());
        task.completed_at = Set(completed_at);
        task.updated_at = Set(now);

        task.update(conn)
            .await
            .map_err(|e| InternalError::database("update_task", e))
    }

    /// Sets Completed and stamps completed_at, even when already completed
    pub async fn complete(
        &self,
        conn: &impl ConnectionTrait,
        existing: task::Model,
        completed_at: DateTime<Utc>,
    ) -> Result<task::Model, InternalError> {
        let mut task: task::ActiveModel = existing.into();
        task.status = Set(TaskStatus::Completed);
        task.completed_at = Set(Some(completed_at));
        task.updated_at = Set(completed_at);

        task.update(conn)
            .await
            .map_err(|e| InternalError::database("complete_task", e))
    }

    pub async fn delete(
        &self,
        conn: &impl ConnectionTrait,
        existing: task::Model,
    ) -> Result<(), InternalError> {
        existing
            .delete(conn)
            .await
            .map_err(|e| InternalError::database("delete_task", e))?;
        Ok(())
    }

    pub async fn search(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        term: &str,
        limit: u64,
    ) -> Result<Vec<task::Model>, InternalError> {
        let Some(condition) = text_search(&SEARCH_COLUMNS, term) else {
            return Ok(Vec::new());
        };

        scope_filter(user, task::Entity::find())
            .filter(condition)
            .order_by_asc(task::Column::Id)
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("search_tasks", e))
    }

    pub async fn stats(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
    ) -> Result<TaskStats, InternalError> {
        let visible = || scope_filter(user, task::Entity::find());

        let total = visible()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_tasks", e))?;
        let pending = visible()
            .filter(task::Column::Status.eq(TaskStatus::Pending))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_pending_tasks", e))?;
        let overdue = overdue(visible(), Utc::now())
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_overdue_tasks", e))?;

        Ok(TaskStats { total, pending, overdue })
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Not completed and due before `now`
fn overdue(query: Select<task::Entity>, now: DateTime<Utc>) -> Select<task::Entity> {
    query
        .filter(task::Column::DueDate.lt(now))
        .filter(task::Column::Status.ne(TaskStatus::Completed))
}

/// Half-open UTC range covering the calendar day
fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = start.checked_add_days(Days::new(1)).unwrap_or(DateTime::<Utc>::MAX_UTC);
    (start, end)
}
