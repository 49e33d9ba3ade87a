use poem_openapi::Object;

use crate::types::db::notification;

#[derive(Object, Debug, Clone)]
pub struct NotificationResponse {
    pub id: String,
    pub message: String,
    pub visitor_id: Option<String>,
    pub is_read: bool,
    pub created_at: i64,
}

impl From<notification::Model> for NotificationResponse {
    fn from(model: notification::Model) -> Self {
        Self {
            id: model.id,
            message: model.message,
            visitor_id: model.visitor_id,
            is_read: model.is_read,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct MarkAllReadResponse {
    /// Number of notifications marked read
    pub updated: u64,
}
