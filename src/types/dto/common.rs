use poem_openapi::Object;
use poem_openapi::payload::Json;

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the database does not answer
    pub status: String,

    /// `up` or `down`
    pub database: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Standardized error response model
#[derive(Object, Debug, Clone)]
pub struct ErrorResponse {
    /// Error type or category
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn json(error: &str, message: impl Into<String>, status_code: u16) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
            status_code,
        })
    }
}

/// Plain acknowledgement
#[derive(Object, Debug)]
pub struct MessageResponse {
    pub message: String,
}
