use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

use crate::errors::internal::{
    AccessPointError, CredentialError, InternalError, NotificationError, UserError, VisitorError,
};
use crate::types::dto::common::ErrorResponse;

/// Error responses shared by the dashboard, user, access point, visitor and
/// notification endpoints
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request is malformed or violates a business rule
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Session is missing, invalid or expired
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Session lacks the required role
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Resource does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Resource state conflicts with the request
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error with a fixed message
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl ApiError {
    pub fn bad_request(error: &str, message: impl Into<String>) -> Self {
        ApiError::BadRequest(ErrorResponse::json(error, message, 400))
    }

    pub fn unauthorized(error: &str, message: impl Into<String>) -> Self {
        ApiError::Unauthorized(ErrorResponse::json(error, message, 401))
    }

    /// Bearer header absent or not a bearer credential
    pub fn missing_token() -> Self {
        ApiError::Unauthorized(ErrorResponse::json(
            "missing_token",
            "Bearer token required",
            401,
        ))
    }

    pub fn admin_required() -> Self {
        ApiError::Forbidden(ErrorResponse::json(
            "admin_required",
            "Admin role required",
            403,
        ))
    }

    pub fn not_found(error: &str, message: impl Into<String>) -> Self {
        ApiError::NotFound(ErrorResponse::json(error, message, 404))
    }

    pub fn conflict(error: &str, message: impl Into<String>) -> Self {
        ApiError::Conflict(ErrorResponse::json(error, message, 409))
    }

    /// Internal server error whose message is fixed by the route
    pub fn internal_error(message: &str) -> Self {
        ApiError::InternalError(ErrorResponse::json("internal_error", message, 500))
    }

    /// Convert InternalError to ApiError
    ///
    /// Domain errors become 4xx responses. Infrastructure errors are logged
    /// and replaced by `fallback_message`, so error details never reach the
    /// client.
    pub fn from_internal_error(err: InternalError, fallback_message: &str) -> Self {
        match err {
            InternalError::Validation { field, message } => {
                tracing::debug!("Validation failed for {}: {}", field, message);
                Self::bad_request("validation_failed", format!("{}: {}", field, message))
            }

            InternalError::Credential(CredentialError::InvalidToken { .. }) => {
                Self::unauthorized("invalid_token", "Invalid or malformed JWT")
            }
            InternalError::Credential(CredentialError::ExpiredToken(_)) => {
                Self::unauthorized("expired_token", "JWT has expired")
            }
            InternalError::Credential(CredentialError::PasswordValidationFailed(message)) => {
                Self::bad_request("password_validation_failed", message)
            }

            InternalError::User(UserError::DuplicateUsername { username }) => {
                tracing::warn!("Duplicate username attempt: {}", username);
                Self::conflict("duplicate_username", "Username already exists")
            }
            InternalError::User(UserError::UserIdNotFound { .. }) => {
                Self::not_found("user_not_found", "User not found")
            }
            InternalError::User(err @ UserError::SelfModificationDenied { .. }) => {
                Self::bad_request("self_modification_denied", err.to_string())
            }

            InternalError::Visitor(VisitorError::VisitorNotFound { .. }) => {
                Self::not_found("visitor_not_found", "Visitor not found")
            }
            InternalError::Visitor(VisitorError::InvalidCheckinCode) => {
                Self::bad_request("invalid_checkin_code", "Invalid check-in code")
            }
            InternalError::Visitor(VisitorError::UnknownHost { .. }) => {
                Self::bad_request("unknown_host", "Host user not found")
            }
            InternalError::Visitor(
                err @ (VisitorError::AlreadyCheckedIn { .. }
                | VisitorError::AlreadyCheckedOut { .. }
                | VisitorError::NotCheckedIn { .. }),
            ) => Self::conflict("invalid_visitor_status", err.to_string()),

            InternalError::AccessPoint(AccessPointError::AccessPointNotFound { .. }) => {
                Self::not_found("access_point_not_found", "Access point not found")
            }
            InternalError::AccessPoint(AccessPointError::DuplicateName { .. }) => {
                Self::conflict("duplicate_access_point", "Access point name already exists")
            }
            InternalError::AccessPoint(AccessPointError::Inactive { .. }) => {
                Self::bad_request("access_point_inactive", "Access point is inactive")
            }

            InternalError::Notification(NotificationError::NotificationNotFound { .. }) => {
                Self::not_found("notification_not_found", "Notification not found")
            }

            err => {
                tracing::error!("{}: {}", fallback_message, err);
                Self::internal_error(fallback_message)
            }
        }
    }

    fn body(&self) -> &ErrorResponse {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Conflict(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }

    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
