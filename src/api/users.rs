use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::helpers::{self, BearerAuth};
use crate::coordinators::{AuthCoordinator, UserCoordinator};
use crate::errors::ApiError;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::{CreateUserRequest, CreatedUserResponse, UpdateRoleRequest, UserResponse};

const LIST_FAILED: &str = "Failed to fetch users";
const CREATE_FAILED: &str = "Failed to create user";
const ROLE_FAILED: &str = "Failed to update user role";
const DELETE_FAILED: &str = "Failed to delete user";

/// User management API. Admin only.
pub struct UsersApi {
    auth_coordinator: Arc<AuthCoordinator>,
    user_coordinator: Arc<UserCoordinator>,
}

impl UsersApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, user_coordinator: Arc<UserCoordinator>) -> Self {
        Self {
            auth_coordinator,
            user_coordinator,
        }
    }
}

#[derive(Tags)]
enum UserTags {
    /// User account management
    Users,
}

#[OpenApi]
impl UsersApi {
    /// All users, sorted by username
    #[oai(path = "/api/users/list", method = "get", tag = "UserTags::Users")]
    async fn list(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<UserResponse>>, ApiError> {
        helpers::admin_context(req, &auth, &self.auth_coordinator, LIST_FAILED).await?;

        let users = self
            .user_coordinator
            .list_users()
            .await
            .map_err(|e| ApiError::from_internal_error(e, LIST_FAILED))?;

        Ok(Json(users.into_iter().map(Into::into).collect()))
    }

    /// Create a user
    ///
    /// When no password is supplied one is generated and returned once.
    #[oai(path = "/api/users", method = "post", tag = "UserTags::Users")]
    async fn create(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<CreatedUserResponse>, ApiError> {
        let ctx = helpers::admin_context(req, &auth, &self.auth_coordinator, CREATE_FAILED).await?;
        let body = body.0;

        let created = self
            .user_coordinator
            .create_user(&ctx, &body.username, &body.full_name, body.role.into(), body.password)
            .await
            .map_err(|e| ApiError::from_internal_error(e, CREATE_FAILED))?;

        Ok(Json(CreatedUserResponse {
            user: created.user.into(),
            generated_password: created.generated_password,
        }))
    }

    /// Change a user's role
    #[oai(path = "/api/users/:id/role", method = "put", tag = "UserTags::Users")]
    async fn update_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateRoleRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let ctx = helpers::admin_context(req, &auth, &self.auth_coordinator, ROLE_FAILED).await?;

        let user = self
            .user_coordinator
            .update_role(&ctx, &id.0, body.role.into())
            .await
            .map_err(|e| ApiError::from_internal_error(e, ROLE_FAILED))?;

        Ok(Json(user.into()))
    }

    /// Delete a user
    #[oai(path = "/api/users/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::admin_context(req, &auth, &self.auth_coordinator, DELETE_FAILED).await?;

        self.user_coordinator
            .delete_user(&ctx, &id.0)
            .await
            .map_err(|e| ApiError::from_internal_error(e, DELETE_FAILED))?;

        Ok(Json(MessageResponse {
            message: "User deleted".to_string(),
        }))
    }
}
