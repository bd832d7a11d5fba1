use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::internal::entity_ref::{EntityKind, EntityRef};

/// Append-only log entry tied to any CRM record
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub description: String,
    #[sea_orm(column_name = "type")]
    pub kind: ActivityType,
    pub user_id: i64,
    pub subject_type: EntityKind,
    pub subject_id: i64,
    pub activity_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn subject(&self) -> EntityRef {
        EntityRef::new(self.subject_type, self.subject_id)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ActivityType {
    #[sea_orm(string_value = "Call")]
    Call,
    #[sea_orm(string_value = "Meeting")]
    Meeting,
    #[sea_orm(string_value = "Email")]
    Email,
    #[sea_orm(string_value = "Note")]
    Note,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
