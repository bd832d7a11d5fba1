use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::authorization::{scope_filter, text_search};
use crate::errors::InternalError;
use crate::stores::fetch_page;
use crate::types::db::lead::{self, LeadStatus};
use crate::types::dto::dashboard::LeadStats;
use crate::types::dto::lead::{LeadFilter, LeadInput};
use crate::types::dto::Page;
use crate::types::internal::AuthenticatedUser;

const LISTING_SEARCH: [lead::Column; 4] = [
    lead::Column::FirstName,
    lead::Column::LastName,
    lead::Column::Email,
    lead::Column::PhoneNumber,
];

const GLOBAL_SEARCH: [lead::Column; 3] = [
    lead::Column::FirstName,
    lead::Column::LastName,
    lead::Column::Email,
];

pub struct LeadStore {}

impl LeadStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Finds a lead by id, soft-deleted rows included
    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
    ) -> Result<Option<lead::Model>, InternalError> {
        lead::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_lead", e))
    }

    /// Finds a lead by email, soft-deleted rows included since the unique index covers them
    pub async fn find_by_email(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<lead::Model>, InternalError> {
        lead::Entity::find()
            .filter(lead::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_lead_by_email", e))
    }

    /// Finds the lead converted into `contact_id`, soft-deleted rows included
    pub async fn find_converted_into(
        &self,
        conn: &impl ConnectionTrait,
        contact_id: i64,
    ) -> Result<Option<lead::Model>, InternalError> {
        lead::Entity::find()
            .filter(lead::Column::ConvertedToContactId.eq(contact_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_lead_by_converted_contact", e))
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        filter: &LeadFilter,
        page: u64,
        per_page: u64,
    ) -> Result<Page<lead::Model>, InternalError> {
        let mut query = scope_filter(user, lead::Entity::find());

        if !filter.with_trashed {
            query = query.filter(lead::Column::DeletedAt.is_null());
        }
        if let Some(status) = filter.status {
            query = query.filter(lead::Column::Status.eq(status));
        }
        if let Some(source) = filter.source {
            query = query.filter(lead::Column::Source.eq(source));
        }
        if let Some(assigned_to_id) = filter.assigned_to_id {
            query = query.filter(lead::Column::AssignedToId.eq(assigned_to_id));
        }
        if let Some(condition) = filter
            .search
            .as_deref()
            .and_then(|term| text_search(&LISTING_SEARCH, term))
        {
            query = query.filter(condition);
        }

        let query = query
            .order_by_desc(lead::Column::CreatedAt)
            .order_by_desc(lead::Column::Id);
        fetch_page(conn, query, page, per_page, "list_leads").await
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        input: &LeadInput,
        assigned_to_id: Option<i64>,
    ) -> Result<lead::Model, InternalError> {
        let now = Utc::now();
        let lead = lead::ActiveModel {
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            email: Set(input.email.clone()),
            phone_number: Set(input.phone_number.clone()),
            source: Set(input.source),
            status: Set(input.status.unwrap_or(LeadStatus::New)),
            assigned_to_id: Set(assigned_to_id),
            converted_to_contact_id: Set(None),
            converted_at: Set(None),
            notes: Set(input.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let lead = lead
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_lead", e))?;
        tracing::debug!(lead_id = lead.id, "Inserted lead");
        Ok(lead)
    }

    /// Replaces the editable fields of `existing`. A missing status keeps the current one.
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: lead::Model,
        input: &LeadInput,
        assigned_to_id: Option<i64>,
    ) -> Result<lead::Model, InternalError> {
        let status = input.status.unwrap_or(existing.status);
        let mut lead: lead::ActiveModel = existing.into();
        lead.first_name = Set(input.first_name.clone());
        lead.last_name = Set(input.last_name.clone());
        lead.email = Set(input.email.clone());
        lead.phone_number = Set(input.phone_number.clone());
        lead.source = Set(input.source);
        lead.status = Set(status);
        lead.assigned_to_id = Set(assigned_to_id);
        lead.notes = Set(input.notes.clone());
        lead.updated_at = Set(Utc::now());

        lead.update(conn)
            .await
            .map_err(|e| InternalError::database("update_lead", e))
    }

    /// Stamps the conversion fields. Status, contact link and timestamp move together.
    pub async fn mark_converted(
        &self,
        conn: &impl ConnectionTrait,
        existing: lead::Model,
        contact_id: i64,
        converted_at: DateTime<Utc>,
    ) -> Result<lead::Model, InternalError> {
        let mut lead: lead::ActiveModel = existing.into();
        lead.status = Set(LeadStatus::Converted);
        lead.converted_to_contact_id = Set(Some(contact_id));
        lead.converted_at = Set(Some(converted_at));
        lead.updated_at = Set(converted_at);

        lead.update(conn)
            .await
            .map_err(|e| InternalError::database("mark_lead_converted", e))
    }

    pub async fn soft_delete(
        &self,
        conn: &impl ConnectionTrait,
        existing: lead::Model,
    ) -> Result<lead::Model, InternalError> {
        let now = Utc::now();
        let mut lead: lead::ActiveModel = existing.into();
        lead.deleted_at = Set(Some(now));
        lead.updated_at = Set(now);

        lead.update(conn)
            .await
            .map_err(|e| InternalError::database("soft_delete_lead", e))
    }

    pub async fn restore(
        &self,
        conn: &impl ConnectionTrait,
        existing: lead::Model,
    ) -> Result<lead::Model, InternalError> {
        let mut lead: lead::ActiveModel = existing.into();
        lead.deleted_at = Set(None);
        lead.updated_at = Set(Utc::now());

        lead.update(conn)
            .await
            .map_err(|e| InternalError::database("restore_lead", e))
    }

    pub async fn force_delete(
        &self,
        conn: &impl ConnectionTrait,
        existing: lead::Model,
    ) -> Result<(), InternalError> {
        existing
            .delete(conn)
            .await
            .map_err(|e| InternalError::database("force_delete_lead", e))?;
        Ok(())
    }

    /// First `limit` visible, non-deleted leads matching `term`, oldest first
    pub async fn search(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        term: &str,
        limit: u64,
    ) -> Result<Vec<lead::Model>, InternalError> {
        let Some(condition) = text_search(&GLOBAL_SEARCH, term) else {
            return Ok(Vec::new());
        };

        scope_filter(user, lead::Entity::find())
            .filter(lead::Column::DeletedAt.is_null())
            .filter(condition)
            .order_by_asc(lead::Column::Id)
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("search_leads", e))
    }

    pub async fn stats(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
    ) -> Result<LeadStats, InternalError> {
        let visible = || scope_filter(user, lead::Entity::find()).filter(lead::Column::DeletedAt.is_null());

        let total = visible()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_leads", e))?;
        let new = visible()
            .filter(lead::Column::Status.eq(LeadStatus::New))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_new_leads", e))?;
        let converted = visible()
            .filter(lead::Column::Status.eq(LeadStatus::Converted))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_converted_leads", e))?;

        Ok(LeadStats { total, new, converted })
    }
}

impl Default for LeadStore {
    fn default() -> Self {
        Self::new()
    }
}
