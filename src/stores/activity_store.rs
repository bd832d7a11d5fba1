use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::authorization::{scope_filter, text_search};
use crate::errors::InternalError;
use crate::stores::fetch_page;
use crate::types::db::activity;
use crate::types::dto::activity::{ActivityFilter, ActivityInput};
use crate::types::dto::Page;
use crate::types::internal::audit::ActivityEntry;
use crate::types::internal::AuthenticatedUser;

const SEARCH_COLUMNS: [activity::Column; 1] = [activity::Column::Description];

pub struct ActivityStore {}

impl ActivityStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
    ) -> Result<Option<activity::Model>, InternalError> {
        activity::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_activity", e))
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        filter: &ActivityFilter,
        page: u64,
        per_page: u64,
    ) -> Result<Page<activity::Model>, InternalError> {
        let mut query = scope_filter(user, activity::Entity::find());

        if let Some(kind) = filter.kind {
            query = query.filter(activity::Column::Kind.eq(kind));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(activity::Column::UserId.eq(user_id));
        }
        if let Some(subject) = filter.subject {
            query = query
                .filter(activity::Column::SubjectType.eq(subject.kind()))
                .filter(activity::Column::SubjectId.eq(subject.id()));
        }
        if let Some(from) = filter.activity_date_from {
            query = query.filter(activity::Column::ActivityDate.gte(from));
        }
        if let Some(to) = filter.activity_date_to {
            query = query.filter(activity::Column::ActivityDate.lte(to));
        }
        if let Some(condition) = filter
            .search
            .as_deref()
            .and_then(|term| text_search(&SEARCH_COLUMNS, term))
        {
            query = query.filter(condition);
        }

        let query = query
            .order_by_desc(activity::Column::ActivityDate)
            .order_by_desc(activity::Column::Id);
        fetch_page(conn, query, page, per_page, "list_activities").await
    }

    /// Newest visible activities first
    pub async fn recent(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        limit: u64,
    ) -> Result<Vec<activity::Model>, InternalError> {
        scope_filter(user, activity::Entity::find())
            .order_by_desc(activity::Column::ActivityDate)
            .order_by_desc(activity::Column::Id)
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("recent_activities", e))
    }

    /// Appends one activity row
    pub async fn append(
        &self,
        conn: &impl ConnectionTrait,
        entry: ActivityEntry,
    ) -> Result<activity::Model, InternalError> {
        let now = Utc::now();
        let activity = activity::ActiveModel {
            description: Set(entry.description),
            kind: Set(entry.kind),
            user_id: Set(entry.user_id),
            subject_type: Set(entry.subject.kind()),
            subject_id: Set(entry.subject.id()),
            activity_date: Set(entry.activity_date.unwrap_or(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let activity = activity
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_activity", e))?;
        tracing::debug!(activity_id = activity.id, subject = %activity.subject(), "Appended activity");
        Ok(activity)
    }

    /// Rewrites description, type, subject and date. The author never changes.
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: activity::Model,
        input: &ActivityInput,
    ) -> Result<activity::Model, InternalError> {
        let activity_date = input.activity_date.unwrap_or(existing.activity_date);
        let mut activity: activity::ActiveModel = existing.into();
        activity.description = Set(input.description.clone());
        activity.kind = Set(input.kind);
        activity.subject_type = Set(input.subject.kind());
        activity.subject_id = Set(input.subject.id());
        activity.activity_date = Set(activity_date);
        activity.updated_at = Set(Utc::now());

        activity
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_activity", e))
    }

    pub async fn delete(
        &self,
        conn: &impl ConnectionTrait,
        existing: activity::Model,
    ) -> Result<(), InternalError> {
        existing
            .delete(conn)
            .await
            .map_err(|e| InternalError::database("delete_activity", e))?;
        Ok(())
    }
}

impl Default for ActivityStore {
    fn default() -> Self {
        Self::new()
    }
}
