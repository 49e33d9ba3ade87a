// API request/response objects
pub mod access_point;
pub mod auth;
pub mod common;
pub mod dashboard;
pub mod notification;
pub mod page;
pub mod user;
pub mod visitor;
