use crate::types::db::user::{self, Role};

/// Authenticated user resolved for the current request
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub full_name: String,
    pub role: Role,

    /// Access token expiration (Unix timestamp)
    pub expires_at: i64,
}

impl Session {
    pub fn from_user(user: user::Model, expires_at: i64) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            expires_at,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
