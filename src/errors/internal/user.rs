use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User already exists: {username}")]
    DuplicateUsername { username: String },

    #[error("User ID not found: {user_id}")]
    UserIdNotFound { user_id: String },

    #[error("Admin cannot {action} their own account")]
    SelfModificationDenied { action: String },
}
