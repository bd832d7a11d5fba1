use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::authorization::{scope_filter, text_search};
use crate::errors::InternalError;
use crate::stores::fetch_page;
use crate::types::db::{company, contact, lead};
use crate::types::dto::contact::{ContactFilter, ContactInput};
use crate::types::dto::Page;
use crate::types::internal::AuthenticatedUser;

const LISTING_SEARCH: [contact::Column; 4] = [
    contact::Column::FirstName,
    contact::Column::LastName,
    contact::Column::Email,
    contact::Column::PhoneNumber,
];

const GLOBAL_SEARCH: [contact::Column; 3] = [
    contact::Column::FirstName,
    contact::Column::LastName,
    contact::Column::Email,
];

pub struct ContactStore {}

impl ContactStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
    ) -> Result<Option<contact::Model>, InternalError> {
        contact::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_contact", e))
    }

    pub async fn find_by_email(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<contact::Model>, InternalError> {
        contact::Entity::find()
            .filter(contact::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_contact_by_email", e))
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        filter: &ContactFilter,
        page: u64,
        per_page: u64,
    ) -> Result<Page<contact::Model>, InternalError> {
        let mut query = scope_filter(user, contact::Entity::find());

        if let Some(company_id) = filter.company_id {
            query = query.filter(contact::Column::CompanyId.eq(company_id));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(contact::Column::OwnerId.eq(owner_id));
        }
        if let Some(condition) = filter
            .search
            .as_deref()
            .and_then(|term| text_search(&LISTING_SEARCH, term))
        {
            query = query.filter(condition);
        }

        let query = query
            .order_by_desc(contact::Column::CreatedAt)
            .order_by_desc(contact::Column::Id);
        fetch_page(conn, query, page, per_page, "list_contacts").await
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        input: &ContactInput,
        owner_id: i64,
    ) -> Result<contact::Model, InternalError> {
        let now = Utc::now();
        let contact = contact::ActiveModel {
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            email: Set(input.email.clone()),
            phone_number: Set(input.phone_number.clone()),
            company_id: Set(input.company_id),
            owner_id: Set(owner_id),
            notes: Set(input.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let contact = contact
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_contact", e))?;
        tracing::debug!(contact_id = contact.id, "Inserted contact");
        Ok(contact)
    }

    /// Inserts the contact produced by converting `lead`
    pub async fn create_from_lead(
        &self,
        conn: &impl ConnectionTrait,
        lead: &lead::Model,
        company_id: Option<i64>,
        owner_id: i64,
    ) -> Result<contact::Model, InternalError> {
        let now = Utc::now();
        let contact = contact::ActiveModel {
            first_name: Set(lead.first_name.clone()),
            last_name: Set(lead.last_name.clone()),
            email: Set(lead.email.clone()),
            phone_number: Set(lead.phone_number.clone()),
            company_id: Set(company_id),
            owner_id: Set(owner_id),
            notes: Set(lead.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        contact
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_converted_contact", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: contact::Model,
        input: &ContactInput,
        owner_id: i64,
    ) -> Result<contact::Model, InternalError> {
        let mut contact: contact::ActiveModel = existing.into();
        contact.first_name = Set(input.first_name.clone());
        contact.last_name = Set(input.last_name.clone());
        contact.email = Set(input.email.clone());
        contact.phone_number = Set(input.phone_number.clone());
        contact.company_id = Set(input.company_id);
        contact.owner_id = Set(owner_id);
        contact.notes = Set(input.notes.clone());
        contact.updated_at = Set(Utc::now());

        contact
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_contact", e))
    }

    /// Hard delete. Fails with a foreign key violation while a converted lead points here.
    pub async fn delete(
        &self,
        conn: &impl ConnectionTrait,
        existing: contact::Model,
    ) -> Result<(), InternalError> {
        existing
            .delete(conn)
            .await
            .map_err(|e| InternalError::database("delete_contact", e))?;
        Ok(())
    }

    /// Search hits paired with the contact's company, when it has one
    pub async fn search(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        term: &str,
        limit: u64,
    ) -> Result<Vec<(contact::Model, Option<company::Model>)>, InternalError> {
        let Some(condition) = text_search(&GLOBAL_SEARCH, term) else {
            return Ok(Vec::new());
        };

        scope_filter(user, contact::Entity::find())
            .filter(condition)
            .order_by_asc(contact::Column::Id)
            .limit(limit)
            .find_also_related(company::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("search_contacts", e))
    }

    pub async fn count_visible(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
    ) -> Result<u64, InternalError> {
        scope_filter(user, contact::Entity::find())
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_contacts", e))
    }
}

impl Default for ContactStore {
    fn default() -> Self {
        Self::new()
    }
}
