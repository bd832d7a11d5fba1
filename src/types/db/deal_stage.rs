use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Pipeline stage. Reference data, seeded once.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "deal_stages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_name = "order")]
    pub position: i32,
    pub color: String,
}

impl Model {
    /// Won and Lost close the pipeline
    pub fn is_closed(&self) -> bool {
        self.name == "Won" || self.name == "Lost"
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::deal::Entity")]
    Deal,
}

impl Related<super::deal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
