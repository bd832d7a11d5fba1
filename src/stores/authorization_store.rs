use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait,
};

use crate::errors::InternalError;
use crate::types::db::{permission, role, role_permission, user_role};
use crate::types::internal::PermissionSet;

/// Roles, permissions and the join tables between them and users
pub struct AuthorizationStore {}

impl AuthorizationStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Returns the permission named `name`, inserting it when missing
    pub async fn ensure_permission(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<permission::Model, InternalError> {
        let existing = permission::Entity::find()
            .filter(permission::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_permission", e))?;
        if let Some(existing) = existing {
            return Ok(existing);
        }

        permission::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_permission", e))
    }

    /// Returns the role named `name`, inserting it when missing
    pub async fn ensure_role(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<role::Model, InternalError> {
        if let Some(existing) = self.find_role_by_name(conn, name).await? {
            return Ok(existing);
        }

        role::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_role", e))
    }

    pub async fn find_role_by_name(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<role::Model>, InternalError> {
        role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_by_name", e))
    }

    /// Adds `permission_id` to the role. Granting twice is a no-op.
    pub async fn grant(
        &self,
        conn: &impl ConnectionTrait,
        role_id: i64,
        permission_id: i64,
    ) -> Result<(), InternalError> {
        let existing = role_permission::Entity::find_by_id((role_id, permission_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_permission", e))?;
        if existing.is_some() {
            return Ok(());
        }

        role_permission::Entity::insert(role_permission::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(permission_id),
        })
        .exec_without_returning(conn)
        .await
        .map_err(|e| InternalError::database("insert_role_permission", e))?;
        Ok(())
    }

    /// Gives the user a role. Assigning twice is a no-op.
    ///
    /// # Returns
    /// true when a new assignment was written
    pub async fn assign_role(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
        role_id: i64,
    ) -> Result<bool, InternalError> {
        let existing = user_role::Entity::find_by_id((user_id, role_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_role", e))?;
        if existing.is_some() {
            return Ok(false);
        }

        user_role::Entity::insert(user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        })
        .exec_without_returning(conn)
        .await
        .map_err(|e| InternalError::database("insert_user_role", e))?;

        tracing::debug!(user_id, role_id, "Assigned role");
        Ok(true)
    }

    /// Union of the permissions granted by every role the user holds
    pub async fn permissions_for_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
    ) -> Result<PermissionSet, InternalError> {
        let role_ids = user_role::Entity::find()
            .select_only()
            .column(user_role::Column::RoleId)
            .filter(user_role::Column::UserId.eq(user_id))
            .into_query();
        let permission_ids = role_permission::Entity::find()
            .select_only()
            .column(role_permission::Column::PermissionId)
            .filter(role_permission::Column::RoleId.in_subquery(role_ids))
            .into_query();

        let names: Vec<String> = permission::Entity::find()
            .select_only()
            .column(permission::Column::Name)
            .filter(permission::Column::Id.in_subquery(permission_ids))
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("permissions_for_user", e))?;

        Ok(names.into_iter().collect())
    }

    pub async fn role_names_for_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
    ) -> Result<Vec<String>, InternalError> {
        let role_ids = user_role::Entity::find()
            .select_only()
            .column(user_role::Column::RoleId)
            .filter(user_role::Column::UserId.eq(user_id))
            .into_query();

        role::Entity::find()
            .select_only()
            .column(role::Column::Name)
            .filter(role::Column::Id.in_subquery(role_ids))
            .order_by_asc(role::Column::Name)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("role_names_for_user", e))
    }
}

impl Default for AuthorizationStore {
    fn default() -> Self {
        Self::new()
    }
}
