use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::helpers::{self, BearerAuth};
use crate::coordinators::{AuthCoordinator, NotificationCoordinator};
use crate::errors::ApiError;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::notification::{MarkAllReadResponse, NotificationResponse};

const FETCH_FAILED: &str = "Failed to fetch notifications";
const UPDATE_FAILED: &str = "Failed to update notifications";

/// Notifications of the signed-in user
pub struct NotificationsApi {
    auth_coordinator: Arc<AuthCoordinator>,
    notification_coordinator: Arc<NotificationCoordinator>,
}

impl NotificationsApi {
    pub fn new(
        auth_coordinator: Arc<AuthCoordinator>,
        notification_coordinator: Arc<NotificationCoordinator>,
    ) -> Self {
        Self {
            auth_coordinator,
            notification_coordinator,
        }
    }
}

#[derive(Tags)]
enum NotificationTags {
    /// Per-user notifications
    Notifications,
}

#[OpenApi(prefix_path = "/api/notifications")]
impl NotificationsApi {
    /// Unread notifications, newest first
    #[oai(path = "/unread", method = "get", tag = "NotificationTags::Notifications")]
    async fn unread(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
        let ctx = helpers::session_context(req, &auth, &self.auth_coordinator, FETCH_FAILED).await?;

        let notifications = self
            .notification_coordinator
            .list_unread(&ctx)
            .await
            .map_err(|e| ApiError::from_internal_error(e, FETCH_FAILED))?;

        Ok(Json(notifications.into_iter().map(Into::into).collect()))
    }

    /// Mark one notification read
    #[oai(path = "/:id/read", method = "post", tag = "NotificationTags::Notifications")]
    async fn mark_read(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::session_context(req, &auth, &self.auth_coordinator, UPDATE_FAILED).await?;

        self.notification_coordinator
            .mark_read(&ctx, &id.0)
            .await
            .map_err(|e| ApiError::from_internal_error(e, UPDATE_FAILED))?;

        Ok(Json(MessageResponse {
            message: "Notification marked read".to_string(),
        }))
    }

    /// Mark all of the caller's notifications read
    #[oai(path = "/read-all", method = "post", tag = "NotificationTags::Notifications")]
    async fn mark_all_read(&self, req: &Request, auth: BearerAuth) -> Result<Json<MarkAllReadResponse>, ApiError> {
        let ctx = helpers::session_context(req, &auth, &self.auth_coordinator, UPDATE_FAILED).await?;

        let updated = self
            .notification_coordinator
            .mark_all_read(&ctx)
            .await
            .map_err(|e| ApiError::from_internal_error(e, UPDATE_FAILED))?;

        Ok(Json(MarkAllReadResponse { updated }))
    }
}
