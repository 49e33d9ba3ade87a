use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::NotificationError;
use crate::stores::insertion_order;
use crate::types::db::notification;

/// Per-user notifications
#[derive(Debug, Default)]
pub struct NotificationStore;

impl NotificationStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_notification(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        message: String,
        visitor_id: Option<String>,
    ) -> Result<notification::Model, InternalError> {
        let model = notification::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            message: Set(message),
            visitor_id: Set(visitor_id),
            is_read: Set(false),
            created_at: Set(Utc::now().timestamp()),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_notification", e))
    }

    /// Unread notifications of a user, newest first
    pub async fn list_unread(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Vec<notification::Model>, InternalError> {
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(insertion_order())
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_unread_notifications", e))
    }

    /// Most recent notifications of a user, read or not
    pub async fn list_recent(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        limit: u64,
    ) -> Result<Vec<notification::Model>, InternalError> {
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(insertion_order())
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_recent_notifications", e))
    }

    pub async fn count_unread(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<u64, InternalError> {
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_unread_notifications", e))
    }

    /// Mark one notification read. Notifications of other users are not found.
    pub async fn mark_read(
        &self,
        conn: &impl ConnectionTrait,
        notification_id: &str,
        user_id: &str,
    ) -> Result<(), InternalError> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::Id.eq(notification_id))
            .filter(notification::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("mark_notification_read", e))?;

        if result.rows_affected == 0 {
            return Err(NotificationError::NotificationNotFound {
                notification_id: notification_id.to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Mark every unread notification of a user read and return the count
    pub async fn mark_all_read(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<u64, InternalError> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("mark_all_notifications_read", e))?;

        Ok(result.rows_affected)
    }
}
