use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::CrmError;
use crate::stores::{AuthorizationStore, UserStore};
use crate::types::db::user;
use crate::types::dto::user::{NewUser, UserSummary};
use crate::types::internal::AuthenticatedUser;

/// User lifecycle and permission resolution
pub struct UserProvider {
    user_store: Arc<UserStore>,
    authorization_store: Arc<AuthorizationStore>,
}

impl UserProvider {
    pub fn new(user_store: Arc<UserStore>, authorization_store: Arc<AuthorizationStore>) -> Self {
        Self {
            user_store,
            authorization_store,
        }
    }

    /// Loads an active user together with their permission set
    ///
    /// # Errors
    /// * `NotFound` - no user with this id
    /// * `Forbidden` - the user is deactivated
    pub async fn authenticate(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
    ) -> Result<AuthenticatedUser, CrmError> {
        let user = self
            .user_store
            .find_by_id(conn, user_id)
            .await?
            .ok_or_else(|| CrmError::not_found("User", user_id))?;

        if !user.is_active {
            return Err(CrmError::forbidden("act as", "inactive user"));
        }

        let permissions = self
            .authorization_store
            .permissions_for_user(conn, user.id)
            .await?;
        tracing::debug!(user_id, permissions = permissions.len(), "Resolved permissions");

        Ok(AuthenticatedUser {
            id: user.id,
            name: user.name,
            email: user.email,
            permissions,
        })
    }

    /// Creates a user and assigns the requested roles
    ///
    /// Run inside a transaction so a bad role name leaves no user behind.
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        input: &NewUser,
    ) -> Result<user::Model, CrmError> {
        input.validate()?;

        if self.user_store.find_by_email(conn, &input.email).await?.is_some() {
            return Err(CrmError::conflict("email", input.email.clone()));
        }

        let mut role_ids = Vec::with_capacity(input.roles.len());
        for name in &input.roles {
            let role = self
                .authorization_store
                .find_role_by_name(conn, name)
                .await?
                .ok_or_else(|| CrmError::invalid("roles", format!("Unknown role '{}'.", name)))?;
            role_ids.push(role.id);
        }

        let user = self
            .user_store
            .create(conn, &input.name, &input.email)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    CrmError::conflict("email", input.email.clone())
                } else {
                    CrmError::from(e)
                }
            })?;

        for role_id in role_ids {
            self.authorization_store.assign_role(conn, user.id, role_id).await?;
        }

        tracing::info!(user_id = user.id, roles = ?input.roles, "User created");
        Ok(user)
    }

    /// # Returns
    /// false when the user already held the role
    pub async fn assign_role(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
        role_name: &str,
    ) -> Result<bool, CrmError> {
        if !self.user_store.exists(conn, user_id).await? {
            return Err(CrmError::not_found("User", user_id));
        }
        let role = self
            .authorization_store
            .find_role_by_name(conn, role_name)
            .await?
            .ok_or_else(|| CrmError::invalid("role", format!("Unknown role '{}'.", role_name)))?;

        let assigned = self.authorization_store.assign_role(conn, user_id, role.id).await?;
        if assigned {
            tracing::info!(user_id, role = role_name, "Role assigned");
        }
        Ok(assigned)
    }

    pub async fn deactivate(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
    ) -> Result<user::Model, CrmError> {
        let user = self
            .user_store
            .set_active(conn, user_id, false)
            .await?
            .ok_or_else(|| CrmError::not_found("User", user_id))?;

        tracing::info!(user_id, "User deactivated");
        Ok(user)
    }

    pub async fn list_users(&self, conn: &impl ConnectionTrait) -> Result<Vec<UserSummary>, CrmError> {
        let users = self.user_store.list(conn).await?;

        let mut summaries = Vec::with_capacity(users.len());
        for user in users {
            let roles = self.authorization_store.role_names_for_user(conn, user.id).await?;
            summaries.push(UserSummary { user, roles });
        }
        Ok(summaries)
    }
}
