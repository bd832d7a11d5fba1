use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::errors::InternalError;
use crate::types::db::deal_stage;

/// The fixed sales pipeline as `(name, order, color)`
pub const PIPELINE: [(&str, i32, &str); 7] = [
    ("Lead", 1, "#6B7280"),
    ("Contacted", 2, "#3B82F6"),
    ("Qualified", 3, "#8B5CF6"),
    ("Proposal", 4, "#F59E0B"),
    ("Negotiation", 5, "#F97316"),
    ("Won", 6, "#10B981"),
    ("Lost", 7, "#EF4444"),
];

pub struct DealStageStore {}

impl DealStageStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<deal_stage::Model>, InternalError> {
        deal_stage::Entity::find()
            .order_by_asc(deal_stage::Column::Position)
            .order_by_asc(deal_stage::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_deal_stages", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
    ) -> Result<Option<deal_stage::Model>, InternalError> {
        deal_stage::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_deal_stage", e))
    }

    pub async fn find_by_name(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<deal_stage::Model>, InternalError> {
        deal_stage::Entity::find()
            .filter(deal_stage::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_deal_stage_by_name", e))
    }

    /// Returns the stage named `name`, inserting it when missing. Existing rows are left as they are.
    pub async fn ensure(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        position: i32,
        color: &str,
    ) -> Result<deal_stage::Model, InternalError> {
        if let Some(existing) = self.find_by_name(conn, name).await? {
            return Ok(existing);
        }

        deal_stage::ActiveModel {
            name: Set(name.to_string()),
            position: Set(position),
            color: Set(color.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_deal_stage", e))
    }
}

impl Default for DealStageStore {
    fn default() -> Self {
        Self::new()
    }
}
