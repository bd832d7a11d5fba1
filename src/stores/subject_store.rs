use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::errors::InternalError;
use crate::types::db::{activity, company, contact, deal, lead, task};
use crate::types::internal::EntityRef;

/// Resolves polymorphic references (`subject_*`, `related_to_*`) against their tables
pub struct SubjectStore {}

impl SubjectStore {
    pub fn new() -> Self {
        Self {}
    }

    /// True when the referenced record exists. Soft-deleted leads and deals count as missing.
    pub async fn exists(
        &self,
        conn: &impl ConnectionTrait,
        subject: EntityRef,
    ) -> Result<bool, InternalError> {
        let count = match subject {
            EntityRef::Lead(id) => {
                lead::Entity::find_by_id(id)
                    .filter(lead::Column::DeletedAt.is_null())
                    .count(conn)
                    .await
            }
            EntityRef::Contact(id) => contact::Entity::find_by_id(id).count(conn).await,
            EntityRef::Company(id) => company::Entity::find_by_id(id).count(conn).await,
            EntityRef::Deal(id) => {
                deal::Entity::find_by_id(id)
                    .filter(deal::Column::DeletedAt.is_null())
                    .count(conn)
                    .await
            }
            EntityRef::Task(id) => task::Entity::find_by_id(id).count(conn).await,
            EntityRef::Activity(id) => activity::Entity::find_by_id(id).count(conn).await,
        }
        .map_err(|e| InternalError::database("subject_exists", e))?;

        Ok(count > 0)
    }
}

impl Default for SubjectStore {
    fn default() -> Self {
        Self::new()
    }
}
