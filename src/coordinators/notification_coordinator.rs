use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::stores::NotificationStore;
use crate::types::db::notification;
use crate::types::internal::context::RequestContext;

/// Notifications shown on the notifications page
const RECENT_NOTIFICATIONS_LIMIT: u64 = 50;

/// Orchestrates the caller's notifications
pub struct NotificationCoordinator {
    db: DatabaseConnection,
    notification_store: Arc<NotificationStore>,
}

impl NotificationCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            notification_store: app_data.notification_store.clone(),
        }
    }

    pub async fn list_unread(&self, ctx: &RequestContext) -> Result<Vec<notification::Model>, InternalError> {
        let session = ctx.require_session()?;
        self.notification_store.list_unread(&self.db, &session.user_id).await
    }

    pub async fn list_recent(&self, ctx: &RequestContext) -> Result<Vec<notification::Model>, InternalError> {
        let session = ctx.require_session()?;
        self.notification_store
            .list_recent(&self.db, &session.user_id, RECENT_NOTIFICATIONS_LIMIT)
            .await
    }

    pub async fn count_unread(&self, ctx: &RequestContext) -> Result<u64, InternalError> {
        let session = ctx.require_session()?;
        self.notification_store.count_unread(&self.db, &session.user_id).await
    }

    pub async fn mark_read(&self, ctx: &RequestContext, notification_id: &str) -> Result<(), InternalError> {
        let session = ctx.require_session()?;
        self.notification_store
            .mark_read(&self.db, notification_id, &session.user_id)
            .await
    }

    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, InternalError> {
        let session = ctx.require_session()?;
        self.notification_store.mark_all_read(&self.db, &session.user_id).await
    }
}
