use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::user;

/// Persistence for CRM users. Users carry no credentials here.
pub struct UserStore {}

impl UserStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    pub async fn find_by_email(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// True when a user row with this id exists, active or not
    pub async fn exists(&self, conn: &impl ConnectionTrait, id: i64) -> Result<bool, InternalError> {
        let count = user::Entity::find_by_id(id)
            .count(conn)
            .await
            .map_err(|e| InternalError::database("user_exists", e))?;
        Ok(count > 0)
    }

    /// Inserts an active user
    ///
    /// # Returns
    /// The stored row, or a database error carrying the unique violation on a duplicate email
    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        email: &str,
    ) -> Result<user::Model, InternalError> {
        let now = Utc::now();
        let user = user::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = user
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_user", e))?;

        tracing::debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<user::Model>, InternalError> {
        user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    /// Flips the active flag; returns None when the user does not exist
    pub async fn set_active(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
        is_active: bool,
    ) -> Result<Option<user::Model>, InternalError> {
        let Some(existing) = self.find_by_id(conn, id).await? else {
            return Ok(None);
        };

        let mut user: user::ActiveModel = existing.into();
        user.is_active = Set(is_active);
        user.updated_at = Set(Utc::now());

        let user = user
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_user_active", e))?;
        Ok(Some(user))
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
