use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "deals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub contact_id: i64,
    pub deal_stage_id: i64,
    /// Amount in cents; see [`Model::amount`]
    pub amount_cents: i64,
    pub closing_date: Option<Date>,
    pub probability: i32,
    pub assigned_to_id: i64,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

impl Model {
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.amount_cents, 2)
    }

    /// amount × probability / 100
    pub fn expected_revenue(&self) -> Decimal {
        self.amount() * Decimal::from(self.probability) / Decimal::ONE_HUNDRED
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contact::Entity",
        from = "Column::ContactId",
        to = "super::contact::Column::Id",
        on_delete = "Cascade"
    )]
    Contact,
    #[sea_orm(
        belongs_to = "super::deal_stage::Entity",
        from = "Column::DealStageId",
        to = "super::deal_stage::Column::Id",
        on_delete = "Restrict"
    )]
    DealStage,
}

impl Related<super::contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contact.def()
    }
}

impl Related<super::deal_stage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DealStage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
