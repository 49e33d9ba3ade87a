use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Notification not found: {notification_id}")]
    NotificationNotFound { notification_id: String },
}
