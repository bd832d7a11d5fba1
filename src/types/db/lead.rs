use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub assigned_to_id: Option<i64>,
    pub converted_to_contact_id: Option<i64>,
    pub converted_at: Option<DateTimeUtc>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_converted(&self) -> bool {
        self.status == LeadStatus::Converted
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum LeadSource {
    #[sea_orm(string_value = "Website")]
    Website,
    #[sea_orm(string_value = "Referral")]
    Referral,
    #[sea_orm(string_value = "Cold Call")]
    #[serde(rename = "Cold Call")]
    ColdCall,
    #[sea_orm(string_value = "Social Media")]
    #[serde(rename = "Social Media")]
    SocialMedia,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum LeadStatus {
    #[sea_orm(string_value = "New")]
    New,
    #[sea_orm(string_value = "Contacted")]
    Contacted,
    #[sea_orm(string_value = "Qualified")]
    Qualified,
    #[sea_orm(string_value = "Unqualified")]
    Unqualified,
    #[sea_orm(string_value = "Converted")]
    Converted,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contact::Entity",
        from = "Column::ConvertedToContactId",
        to = "super::contact::Column::Id",
        on_delete = "Restrict"
    )]
    ConvertedContact,
}

impl Related<super::contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConvertedContact.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
