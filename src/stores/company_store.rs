use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::authorization::{scope_filter, text_search};
use crate::errors::InternalError;
use crate::stores::fetch_page;
use crate::types::db::company;
use crate::types::dto::company::{CompanyFilter, CompanyInput};
use crate::types::dto::Page;
use crate::types::internal::AuthenticatedUser;

const SEARCH_COLUMNS: [company::Column; 3] = [
    company::Column::Name,
    company::Column::Industry,
    company::Column::Website,
];

pub struct CompanyStore {}

impl CompanyStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
    ) -> Result<Option<company::Model>, InternalError> {
        company::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_company", e))
    }

    pub async fn exists(&self, conn: &impl ConnectionTrait, id: i64) -> Result<bool, InternalError> {
        let count = company::Entity::find_by_id(id)
            .count(conn)
            .await
            .map_err(|e| InternalError::database("company_exists", e))?;
        Ok(count > 0)
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        filter: &CompanyFilter,
        page: u64,
        per_page: u64,
    ) -> Result<Page<company::Model>, InternalError> {
        let mut query = scope_filter(user, company::Entity::find());

        if let Some(industry) = filter.industry.as_deref() {
            query = query.filter(company::Column::Industry.eq(industry));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(company::Column::OwnerId.eq(owner_id));
        }
        if let Some(condition) = filter
            .search
            .as_deref()
            .and_then(|term| text_search(&SEARCH_COLUMNS, term))
        {
            query = query.filter(condition);
        }

        let query = query
            .order_by_desc(company::Column::CreatedAt)
            .order_by_desc(company::Column::Id);
        fetch_page(conn, query, page, per_page, "list_companies").await
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        input: &CompanyInput,
        owner_id: i64,
    ) -> Result<company::Model, InternalError> {
        let now = Utc::now();
        let company = company::ActiveModel {
            name: Set(input.name.clone()),
            industry: Set(input.industry.clone()),
            website: Set(input.website.clone()),
            phone_number: Set(input.phone_number.clone()),
            address: Set(input.address.clone()),
            owner_id: Set(owner_id),
            notes: Set(input.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let company = company
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_company", e))?;
        tracing::debug!(company_id = company.id, "Inserted company");
        Ok(company)
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: company::Model,
        input: &CompanyInput,
        owner_id: i64,
    ) -> Result<company::Model, InternalError> {
        let mut company: company::ActiveModel = existing.into();
        company.name = Set(input.name.clone());
        company.industry = Set(input.industry.clone());
        company.website = Set(input.website.clone());
        company.phone_number = Set(input.phone_number.clone());
        company.address = Set(input.address.clone());
        company.owner_id = Set(owner_id);
        company.notes = Set(input.notes.clone());
        company.updated_at = Set(Utc::now());

        company
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_company", e))
    }

    /// Hard delete; contacts keep existing with their company cleared
    pub async fn delete(
        &self,
        conn: &impl ConnectionTrait,
        existing: company::Model,
    ) -> Result<(), InternalError> {
        existing
            .delete(conn)
            .await
            .map_err(|e| InternalError::database("delete_company", e))?;
        Ok(())
    }

    pub async fn search(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        term: &str,
        limit: u64,
    ) -> Result<Vec<company::Model>, InternalError> {
        let Some(condition) = text_search(&SEARCH_COLUMNS, term) else {
            return Ok(Vec::new());
        };

        scope_filter(user, company::Entity::find())
            .filter(condition)
            .order_by_asc(company::Column::Id)
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("search_companies", e))
    }

    pub async fn count_visible(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
    ) -> Result<u64, InternalError> {
        scope_filter(user, company::Entity::find())
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_companies", e))
    }
}

impl Default for CompanyStore {
    fn default() -> Self {
        Self::new()
    }
}
