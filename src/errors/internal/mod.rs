use thiserror::Error;

pub mod access_point;
pub mod credential;
pub mod database;
pub mod notification;
pub mod user;
pub mod visitor;

pub use access_point::AccessPointError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use notification::NotificationError;
pub use user::UserError;
pub use visitor::VisitorError;

/// Internal error type for store, service and coordinator operations
///
/// Infrastructure errors are shared, domain errors are grouped per entity.
/// Not exposed via API - endpoints must convert to AuthError or ApiError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse { value_type: String, message: String },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },

    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Visitor(#[from] VisitorError),

    #[error(transparent)]
    AccessPoint(#[from] AccessPointError),

    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> InternalError {
        InternalError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// True for failures the caller cannot fix (database, parsing, crypto)
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            InternalError::Database(_) | InternalError::Parse { .. } | InternalError::Crypto { .. }
        )
    }
}
