use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::authorization::Resource;

/// Type tag persisted alongside polymorphic ids (`subject_type`, `related_to_type`)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[sea_orm(string_value = "lead")]
    Lead,
    #[sea_orm(string_value = "contact")]
    Contact,
    #[sea_orm(string_value = "company")]
    Company,
    #[sea_orm(string_value = "deal")]
    Deal,
    #[sea_orm(string_value = "task")]
    Task,
    #[sea_orm(string_value = "activity")]
    Activity,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Lead => "lead",
            EntityKind::Contact => "contact",
            EntityKind::Company => "company",
            EntityKind::Deal => "deal",
            EntityKind::Task => "task",
            EntityKind::Activity => "activity",
        }
    }

    /// Human readable name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Lead => "Lead",
            EntityKind::Contact => "Contact",
            EntityKind::Company => "Company",
            EntityKind::Deal => "Deal",
            EntityKind::Task => "Task",
            EntityKind::Activity => "Activity",
        }
    }

    pub fn resource(&self) -> Resource {
        match self {
            EntityKind::Lead => Resource::Leads,
            EntityKind::Contact => Resource::Contacts,
            EntityKind::Company => Resource::Companies,
            EntityKind::Deal => Resource::Deals,
            EntityKind::Task => Resource::Tasks,
            EntityKind::Activity => Resource::Activities,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polymorphic reference to a CRM record
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum EntityRef {
    Lead(i64),
    Contact(i64),
    Company(i64),
    Deal(i64),
    Task(i64),
    Activity(i64),
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: i64) -> Self {
        match kind {
            EntityKind::Lead => EntityRef::Lead(id),
            EntityKind::Contact => EntityRef::Contact(id),
            EntityKind::Company => EntityRef::Company(id),
            EntityKind::Deal => EntityRef::Deal(id),
            EntityKind::Task => EntityRef::Task(id),
            EntityKind::Activity => EntityRef::Activity(id),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Lead(_) => EntityKind::Lead,
            EntityRef::Contact(_) => EntityKind::Contact,
            EntityRef::Company(_) => EntityKind::Company,
            EntityRef::Deal(_) => EntityKind::Deal,
            EntityRef::Task(_) => EntityKind::Task,
            EntityRef::Activity(_) => EntityKind::Activity,
        }
    }

    pub fn id(&self) -> i64 {
        match *self {
            EntityRef::Lead(id)
            | EntityRef::Contact(id)
            | EntityRef::Company(id)
            | EntityRef::Deal(id)
            | EntityRef::Task(id)
            | EntityRef::Activity(id) => id,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Iterable;

    use super::*;

    #[test]
    fn test_new_and_accessors_agree() {
        for kind in EntityKind::iter() {
            let entity_ref = EntityRef::new(kind, 42);
            assert_eq!(entity_ref.kind(), kind);
            assert_eq!(entity_ref.id(), 42);
        }
    }

    #[test]
    fn test_tag_matches_database_value() {
        for kind in EntityKind::iter() {
            assert_eq!(kind.to_value(), kind.as_str());
        }
    }

    #[test]
    fn test_serializes_as_tagged_pair() {
        let json = serde_json::to_value(EntityRef::Contact(3)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "contact", "id": 3}));

        let parsed: EntityRef = serde_json::from_value(serde_json::json!({"type": "task", "id": 9})).unwrap();
        assert_eq!(parsed, EntityRef::Task(9));
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityRef::Lead(5).to_string(), "lead#5");
    }
}
