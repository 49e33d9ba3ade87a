use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::UserError;
use crate::services::{PasswordHasherService, crypto};
use crate::stores::UserStore;
use crate::types::db::user::{self, Role};
use crate::types::internal::context::RequestContext;

/// Account created by an admin, with the generated password when one was
/// not supplied
#[derive(Debug)]
pub struct CreatedUser {
    pub user: user::Model,
    pub generated_password: Option<String>,
}

/// Orchestrates user account management
///
/// `list_users` is the single user-list query, shared by the users API and
/// the users page.
pub struct UserCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    password_hasher: Arc<PasswordHasherService>,
}

impl UserCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            password_hasher: app_data.password_hasher.clone(),
        }
    }

    /// All users ordered by username
    pub async fn list_users(&self) -> Result<Vec<user::Model>, InternalError> {
        self.user_store.list_users(&self.db).await
    }

    /// Create an account, generating a password when none is given
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        username: &str,
        full_name: &str,
        role: Role,
        password: Option<String>,
    ) -> Result<CreatedUser, InternalError> {
        let username = username.trim();
        let full_name = full_name.trim();
        if username.is_empty() {
            return Err(InternalError::validation("username", "must not be blank"));
        }
        if full_name.is_empty() {
            return Err(InternalError::validation("full_name", "must not be blank"));
        }

        let (password, generated_password) = match password {
            Some(password) => (password, None),
            None => {
                let generated = crypto::generate_secure_password();
                (generated.clone(), Some(generated))
            }
        };

        self.password_hasher.validate(&password)?;
        let password_hash = self.password_hasher.hash(&password)?;

        let user = self
            .user_store
            .create_user(&self.db, username, full_name, password_hash, role)
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id(),
            user_id = %user.id,
            role = %user.role,
            "User created: {}",
            user.username
        );

        Ok(CreatedUser { user, generated_password })
    }

    /// Change a user's role. Admins cannot demote themselves.
    pub async fn update_role(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        let session = ctx.require_session()?;
        if session.user_id == user_id && role != Role::Admin {
            return Err(UserError::SelfModificationDenied { action: "demote".to_string() }.into());
        }

        let user = self.user_store.update_role(&self.db, user_id, role).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %session.user_id,
            user_id = %user.id,
            role = %user.role,
            "User role changed"
        );

        Ok(user)
    }

    /// Delete a user. Admins cannot delete themselves.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: &str) -> Result<(), InternalError> {
        let session = ctx.require_session()?;
        if session.user_id == user_id {
            return Err(UserError::SelfModificationDenied { action: "delete".to_string() }.into());
        }

        self.user_store.delete_user(&self.db, user_id).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %session.user_id,
            user_id = %user_id,
            "User deleted"
        );

        Ok(())
    }
}
