// Database entities - SeaORM models
pub mod access_point;
pub mod notification;
pub mod refresh_token;
pub mod user;
pub mod visitor;
pub mod visitor_log;
