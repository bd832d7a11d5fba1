use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::authorization::{scope_filter, text_search};
use crate::errors::InternalError;
use crate::stores::fetch_page;
use crate::types::db::{contact, deal, deal_stage};
use crate::types::dto::dashboard::DealStats;
use crate::types::dto::deal::{DealFigures, DealFilter, DealInput};
use crate::types::dto::Page;
use crate::types::internal::AuthenticatedUser;

const LISTING_SEARCH: [deal::Column; 2] = [deal::Column::Name, deal::Column::Description];
const GLOBAL_SEARCH: [deal::Column; 1] = [deal::Column::Name];
const CLOSED_STAGES: [&str; 2] = ["Won", "Lost"];

pub struct DealStore {}

impl DealStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Finds a deal by id, soft-deleted rows included
    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
    ) -> Result<Option<deal::Model>, InternalError> {
        deal::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_deal", e))
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        filter: &DealFilter,
        page: u64,
        per_page: u64,
    ) -> Result<Page<deal::Model>, InternalError> {
        let mut query = scope_filter(user, deal::Entity::find());

        if !filter.with_trashed {
            query = query.filter(deal::Column::DeletedAt.is_null());
        }
        if let Some(stage_id) = filter.stage_id {
            query = query.filter(deal::Column::DealStageId.eq(stage_id));
        }
        if let Some(assigned_to_id) = filter.assigned_to_id {
            query = query.filter(deal::Column::AssignedToId.eq(assigned_to_id));
        }
        if let Some(from) = filter.closing_date_from {
            query = query.filter(deal::Column::ClosingDate.gte(from));
        }
        if let Some(to) = filter.closing_date_to {
            query = query.filter(deal::Column::ClosingDate.lte(to));
        }
        if let Some(condition) = filter
            .search
            .as_deref()
            .and_then(|term| text_search(&LISTING_SEARCH, term))
        {
            query = query.filter(condition);
        }

        let query = query
            .order_by_desc(deal::Column::CreatedAt)
            .order_by_desc(deal::Column::Id);
        fetch_page(conn, query, page, per_page, "list_deals").await
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        input: &DealInput,
        figures: DealFigures,
        assigned_to_id: i64,
    ) -> Result<deal::Model, InternalError> {
        let now = Utc::now();
        let deal = deal::ActiveModel {
            name: Set(input.name.clone()),
            contact_id: Set(input.contact_id),
            deal_stage_id: Set(input.deal_stage_id),
            amount_cents: Set(figures.amount_cents),
            closing_date: Set(input.closing_date),
            probability: Set(figures.probability),
            assigned_to_id: Set(assigned_to_id),
            description: Set(input.description.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let deal = deal
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_deal", e))?;
        tracing::debug!(deal_id = deal.id, "Inserted deal");
        Ok(deal)
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: deal::Model,
        input: &DealInput,
        figures: DealFigures,
        assigned_to_id: i64,
    ) -> Result<deal::Model, InternalError> {
        let mut deal: deal::ActiveModel = existing.into();
        deal.name = Set(input.name.clone());
        deal.contact_id = Set(input.contact_id);
        deal.deal_stage_id = Set(input.deal_stage_id);
        deal.amount_cents = Set(figures.amount_cents);
        deal.closing_date = Set(input.closing_date);
        deal.probability = Set(figures.probability);
        deal.assigned_to_id = Set(assigned_to_id);
        deal.description = Set(input.description.clone());
        deal.updated_at = Set(Utc::now());

        deal.update(conn)
            .await
            .map_err(|e| InternalError::database("update_deal", e))
    }

    pub async fn set_stage(
        &self,
        conn: &impl ConnectionTrait,
        existing: deal::Model,
        deal_stage_id: i64,
    ) -> Result<deal::Model, InternalError> {
        let mut deal: deal::ActiveModel = existing.into();
        deal.deal_stage_id = Set(deal_stage_id);
        deal.updated_at = Set(Utc::now());

        deal.update(conn)
            .await
            .map_err(|e| InternalError::database("set_deal_stage", e))
    }

    pub async fn soft_delete(
        &self,
        conn: &impl ConnectionTrait,
        existing: deal::Model,
    ) -> Result<deal::Model, InternalError> {
        let now = Utc::now();
        let mut deal: deal::ActiveModel = existing.into();
        deal.deleted_at = Set(Some(now));
        deal.updated_at = Set(now);

        deal.update(conn)
            .await
            .map_err(|e| InternalError::database("soft_delete_deal", e))
    }

    pub async fn restore(
        &self,
        conn: &impl ConnectionTrait,
        existing: deal::Model,
    ) -> Result<deal::Model, InternalError> {
        let mut deal: deal::ActiveModel = existing.into();
        deal.deleted_at = Set(None);
        deal.updated_at = Set(Utc::now());

        deal.update(conn)
            .await
            .map_err(|e| InternalError::database("restore_deal", e))
    }

    pub async fn force_delete(
        &self,
        conn: &impl ConnectionTrait,
        existing: deal::Model,
    ) -> Result<(), InternalError> {
        existing
            .delete(conn)
            .await
            .map_err(|e| InternalError::database("force_delete_deal", e))?;
        Ok(())
    }

    /// Search hits by name paired with the deal's contact
    pub async fn search(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
        term: &str,
        limit: u64,
    ) -> Result<Vec<(deal::Model, Option<contact::Model>)>, InternalError> {
        let Some(condition) = text_search(&GLOBAL_SEARCH, term) else {
            return Ok(Vec::new());
        };

        scope_filter(user, deal::Entity::find())
            .filter(deal::Column::DeletedAt.is_null())
            .filter(condition)
            .order_by_asc(deal::Column::Id)
            .limit(limit)
            .find_also_related(contact::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("search_deals", e))
    }

    pub async fn stats(
        &self,
        conn: &impl ConnectionTrait,
        user: &AuthenticatedUser,
    ) -> Result<DealStats, InternalError> {
        let visible = || scope_filter(user, deal::Entity::find()).filter(deal::Column::DeletedAt.is_null());

        let total = visible()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_deals", e))?;
        let active = visible()
            .inner_join(deal_stage::Entity)
            .filter(deal_stage::Column::Name.is_not_in(CLOSED_STAGES))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_active_deals", e))?;
        let total_cents: Option<i64> = visible()
            .select_only()
            .column_as(Expr::col((deal::Entity, deal::Column::AmountCents)).sum(), "total_cents")
            .into_tuple::<Option<i64>>()
            .one(conn)
            .await
            .map_err(|e| InternalError::database("sum_deal_amounts", e))?
            .flatten();

        Ok(DealStats {
            total,
            active,
            total_value: Decimal::new(total_cents.unwrap_or_default(), 2),
        })
    }
}

impl Default for DealStore {
    fn default() -> Self {
        Self::new()
    }
}
