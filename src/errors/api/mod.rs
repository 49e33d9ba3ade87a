// API-facing error types
pub mod app;
pub mod auth;

pub use app::ApiError;
pub use auth::AuthError;
