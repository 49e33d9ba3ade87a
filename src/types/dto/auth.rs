use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::dto::user::RoleDto;

/// Request model for sign-in
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing authentication tokens
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    pub refresh_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

/// Describes how to sign in; the target of unauthenticated page redirects
#[derive(Object, Debug)]
pub struct SignInDescriptor {
    /// HTTP method to use
    pub method: String,

    /// Where to post credentials
    pub action: String,

    /// Fields expected in the JSON body
    pub fields: Vec<String>,
}

/// Current session
#[derive(Object, Debug)]
pub struct SessionResponse {
    pub user_id: String,
    pub username: String,
    pub full_name: String,
    pub role: RoleDto,

    /// Token expiration time (Unix timestamp)
    pub expires_at: i64,
}

/// Request model for token refresh
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token to exchange for a new access token
    pub refresh_token: String,
}

/// Response model for token refresh
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

/// Request model for sign-out
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to revoke
    pub refresh_token: String,
}

/// Request model for password change
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password for verification
    pub old_password: String,

    /// New password to set
    pub new_password: String,
}
