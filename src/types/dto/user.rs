use poem_openapi::{Enum, Object};

use crate::types::db::user::{self, Role};

/// User role as exposed over the API
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
pub enum RoleDto {
    Admin,
    Staff,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => RoleDto::Admin,
            Role::Staff => RoleDto::Staff,
        }
    }
}

impl From<RoleDto> for Role {
    fn from(role: RoleDto) -> Self {
        match role {
            RoleDto::Admin => Role::Admin,
            RoleDto::Staff => Role::Staff,
        }
    }
}

/// User account without credentials
#[derive(Object, Debug, Clone)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub role: RoleDto,
    pub created_at: i64,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            full_name: model.full_name,
            role: model.role.into(),
            created_at: model.created_at,
        }
    }
}

/// Request to create a user account
#[derive(Object, Debug)]
pub struct CreateUserRequest {
    pub username: String,
    pub full_name: String,
    pub role: RoleDto,

    /// Initial password. Generated when omitted.
    pub password: Option<String>,
}

/// Created account
#[derive(Object, Debug)]
pub struct CreatedUserResponse {
    pub user: UserResponse,

    /// Generated password, shown only once. Absent when the caller supplied one.
    pub generated_password: Option<String>,
}

/// Request to change a user's role
#[derive(Object, Debug)]
pub struct UpdateRoleRequest {
    pub role: RoleDto,
}
