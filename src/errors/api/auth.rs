use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

use crate::errors::internal::{CredentialError, InternalError, UserError};
use crate::types::dto::common::ErrorResponse;

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid username or password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Current password is incorrect (for password change)
    #[oai(status = 401)]
    IncorrectPassword(Json<ErrorResponse>),

    /// Password validation failed
    #[oai(status = 400)]
    PasswordValidationFailed(Json<ErrorResponse>),

    /// Invalid or malformed JWT
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// JWT has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// Invalid refresh token
    #[oai(status = 401)]
    InvalidRefreshToken(Json<ErrorResponse>),

    /// Refresh token has expired
    #[oai(status = 401)]
    ExpiredRefreshToken(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(ErrorResponse::json(
            "invalid_credentials",
            "Invalid username or password",
            401,
        ))
    }

    pub fn incorrect_password() -> Self {
        AuthError::IncorrectPassword(ErrorResponse::json(
            "incorrect_password",
            "Current password is incorrect",
            401,
        ))
    }

    pub fn password_validation_failed(message: String) -> Self {
        AuthError::PasswordValidationFailed(ErrorResponse::json("password_validation_failed", message, 400))
    }

    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(ErrorResponse::json("invalid_token", "Invalid or malformed JWT", 401))
    }

    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(ErrorResponse::json("expired_token", "JWT has expired", 401))
    }

    pub fn invalid_refresh_token() -> Self {
        AuthError::InvalidRefreshToken(ErrorResponse::json(
            "invalid_refresh_token",
            "Invalid refresh token",
            401,
        ))
    }

    pub fn expired_refresh_token() -> Self {
        AuthError::ExpiredRefreshToken(ErrorResponse::json(
            "expired_refresh_token",
            "Refresh token has expired",
            401,
        ))
    }

    /// Generic internal server error. Never carries internal details.
    pub fn internal_server_error() -> Self {
        AuthError::InternalError(ErrorResponse::json(
            "internal_error",
            "An internal error occurred",
            500,
        ))
    }

    /// Convert InternalError to AuthError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::IncorrectPassword) => {
                tracing::debug!("Incorrect password for password change");
                Self::incorrect_password()
            }
            InternalError::Credential(CredentialError::PasswordValidationFailed(message)) => {
                tracing::debug!("Password validation failed: {}", message);
                Self::password_validation_failed(message.clone())
            }
            InternalError::Credential(CredentialError::InvalidToken { token_type, reason }) => {
                tracing::debug!("Invalid token: {} - {}", token_type, reason);
                if token_type == "refresh_token" {
                    Self::invalid_refresh_token()
                } else {
                    Self::invalid_token()
                }
            }
            InternalError::Credential(CredentialError::ExpiredToken(token_type)) => {
                tracing::debug!("Expired token: {}", token_type);
                if token_type == "refresh_token" {
                    Self::expired_refresh_token()
                } else {
                    Self::expired_token()
                }
            }
            // The session user was deleted after the token was issued
            InternalError::User(UserError::UserIdNotFound { .. }) => Self::invalid_token(),
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn body(&self) -> &ErrorResponse {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::IncorrectPassword(json)
            | AuthError::PasswordValidationFailed(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::InvalidRefreshToken(json)
            | AuthError::ExpiredRefreshToken(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let internal_err = InternalError::database("get_user", DbErr::RecordNotFound("test".to_string()));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.message(), "An internal error occurred");
        assert_eq!(auth_err.status_code(), 500);
    }

    #[test]
    fn test_invalid_credentials_converts_correctly() {
        let auth_err = AuthError::from_internal_error(CredentialError::InvalidCredentials.into());

        assert_eq!(auth_err.message(), "Invalid username or password");
        assert_eq!(auth_err.status_code(), 401);
    }

    #[test]
    fn test_refresh_token_errors_keep_token_type() {
        let invalid = AuthError::from_internal_error(
            CredentialError::invalid_token("refresh_token", "not found").into(),
        );
        assert!(matches!(invalid, AuthError::InvalidRefreshToken(_)));

        let expired =
            AuthError::from_internal_error(CredentialError::ExpiredToken("refresh_token".to_string()).into());
        assert!(matches!(expired, AuthError::ExpiredRefreshToken(_)));
    }

    #[test]
    fn test_jwt_errors_convert_correctly() {
        let invalid = AuthError::from_internal_error(CredentialError::invalid_token("jwt", "bad signature").into());
        assert!(matches!(invalid, AuthError::InvalidToken(_)));

        let expired = AuthError::from_internal_error(CredentialError::ExpiredToken("jwt".to_string()).into());
        assert!(matches!(expired, AuthError::ExpiredToken(_)));
    }

    #[test]
    fn test_deleted_session_user_is_invalid_token() {
        let auth_err = AuthError::from_internal_error(
            UserError::UserIdNotFound {
                user_id: "gone".to_string(),
            }
            .into(),
        );

        assert!(matches!(auth_err, AuthError::InvalidToken(_)));
    }
}
