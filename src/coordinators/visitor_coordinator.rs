use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{AccessPointError, VisitorError};
use crate::services::CheckinCodeService;
use crate::stores::visitor_store::NewVisitor;
use crate::stores::{AccessPointStore, NotificationStore, UserStore, VisitorStore};
use crate::types::db::{access_point, user};
use crate::types::db::visitor::{self, VisitorStatus};
use crate::types::db::visitor_log::{self, VisitorLogEvent};
use crate::types::dto::visitor::RegisterVisitorRequest;
use crate::types::internal::context::RequestContext;

/// Orchestrates visitor registration and QR check-in/check-out
///
/// Status only moves registered → active → inactive. Each transition
/// writes a log entry and notifies the host in the same transaction.
pub struct VisitorCoordinator {
    db: DatabaseConnection,
    visitor_store: Arc<VisitorStore>,
    user_store: Arc<UserStore>,
    access_point_store: Arc<AccessPointStore>,
    notification_store: Arc<NotificationStore>,
    checkin_codes: Arc<CheckinCodeService>,
}

impl VisitorCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            visitor_store: app_data.visitor_store.clone(),
            user_store: app_data.user_store.clone(),
            access_point_store: app_data.access_point_store.clone(),
            notification_store: app_data.notification_store.clone(),
            checkin_codes: app_data.checkin_codes.clone(),
        }
    }

    /// Register a visitor hosted by `host_user_id`, or by the caller
    ///
    /// # Returns
    /// * `Ok((visitor, checkin_code))`
    pub async fn register(
        &self,
        ctx: &RequestContext,
        request: RegisterVisitorRequest,
    ) -> Result<(visitor::Model, String), InternalError> {
        let session = ctx.require_session()?;

        let full_name = required_field("full_name", &request.full_name)?;
        let phone = required_field("phone", &request.phone)?;
        let purpose = required_field("purpose", &request.purpose)?;

        let host_user_id = match optional_field(request.host_user_id) {
            Some(host_user_id) => {
                if self.user_store.find_by_id(&self.db, &host_user_id).await?.is_none() {
                    return Err(VisitorError::UnknownHost { user_id: host_user_id }.into());
                }
                host_user_id
            }
            None => session.user_id.clone(),
        };

        let visitor = self
            .visitor_store
            .create_visitor(
                &self.db,
                NewVisitor {
                    full_name,
                    phone,
                    email: optional_field(request.email),
                    company: optional_field(request.company),
                    purpose,
                    host_user_id: Some(host_user_id),
                    registered_by: Some(session.user_id.clone()),
                    expected_at: request.expected_at,
                },
            )
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %session.user_id,
            visitor_id = %visitor.id,
            "Visitor registered"
        );

        let code = self.checkin_codes.code_for(&visitor.id)?;
        Ok((visitor, code))
    }

    /// Visitor with its check-in code
    pub async fn get_visitor(&self, visitor_id: &str) -> Result<(visitor::Model, String), InternalError> {
        let visitor = self.visitor_store.get_by_id(&self.db, visitor_id).await?;
        let code = self.checkin_codes.code_for(&visitor.id)?;
        Ok((visitor, code))
    }

    /// QR content for a visitor
    pub async fn qr_payload(&self, visitor_id: &str) -> Result<String, InternalError> {
        let visitor = self.visitor_store.get_by_id(&self.db, visitor_id).await?;
        self.checkin_codes.qr_payload(&visitor.id)
    }

    /// Check a visitor in from a scanned QR payload or raw code
    pub async fn check_in(
        &self,
        ctx: &RequestContext,
        code: &str,
        access_point_id: &str,
    ) -> Result<visitor::Model, InternalError> {
        let session = ctx.require_session()?;

        let visitor_id = match self.checkin_codes.verify(code) {
            Ok(visitor_id) => visitor_id,
            Err(err) => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    ip = ?ctx.ip_address,
                    actor = %session.user_id,
                    "Rejected check-in code"
                );
                return Err(err);
            }
        };

        let access_point = self.checkin_access_point(access_point_id).await?;
        let visitor = self.visitor_store.get_by_id(&self.db, &visitor_id).await?;

        match visitor.status {
            VisitorStatus::Registered => {}
            VisitorStatus::Active => return Err(VisitorError::AlreadyCheckedIn { visitor_id }.into()),
            VisitorStatus::Inactive => return Err(VisitorError::AlreadyCheckedOut { visitor_id }.into()),
        }

        let now = Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("begin_transaction", e))?;

        if !self
            .visitor_store
            .mark_checked_in(&txn, &visitor_id, &access_point.id, now)
            .await?
        {
            return Err(VisitorError::AlreadyCheckedIn { visitor_id }.into());
        }

        self.visitor_store
            .append_log(
                &txn,
                &visitor_id,
                Some(access_point.id.clone()),
                VisitorLogEvent::CheckIn,
                Some(session.user_id.clone()),
                now,
            )
            .await?;

        if let Some(host_user_id) = &visitor.host_user_id {
            self.notification_store
                .create_notification(
                    &txn,
                    host_user_id,
                    format!("{} checked in at {}", visitor.full_name, access_point.name),
                    Some(visitor_id.clone()),
                )
                .await?;
        }

        txn.commit()
            .await
            .map_err(|e| InternalError::database("commit_transaction", e))?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %session.user_id,
            visitor_id = %visitor_id,
            access_point_id = %access_point.id,
            "Visitor checked in"
        );

        self.visitor_store.get_by_id(&self.db, &visitor_id).await
    }

    /// Check an active visitor out
    pub async fn check_out(
        &self,
        ctx: &RequestContext,
        visitor_id: &str,
        access_point_id: Option<String>,
    ) -> Result<visitor::Model, InternalError> {
        let session = ctx.require_session()?;

        let access_point = match access_point_id {
            Some(id) => Some(self.known_access_point(&id).await?),
            None => None,
        };

        let visitor = self.visitor_store.get_by_id(&self.db, visitor_id).await?;
        let visitor_id = visitor.id.clone();

        match visitor.status {
            VisitorStatus::Active => {}
            VisitorStatus::Registered => return Err(VisitorError::NotCheckedIn { visitor_id }.into()),
            VisitorStatus::Inactive => return Err(VisitorError::AlreadyCheckedOut { visitor_id }.into()),
        }

        let now = Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("begin_transaction", e))?;

        if !self.visitor_store.mark_checked_out(&txn, &visitor_id, now).await? {
            return Err(VisitorError::AlreadyCheckedOut { visitor_id }.into());
        }

        self.visitor_store
            .append_log(
                &txn,
                &visitor_id,
                access_point.as_ref().map(|a| a.id.clone()),
                VisitorLogEvent::CheckOut,
                Some(session.user_id.clone()),
                now,
            )
            .await?;

        if let Some(host_user_id) = &visitor.host_user_id {
            self.notification_store
                .create_notification(
                    &txn,
                    host_user_id,
                    format!("{} checked out", visitor.full_name),
                    Some(visitor_id.clone()),
                )
                .await?;
        }

        txn.commit()
            .await
            .map_err(|e| InternalError::database("commit_transaction", e))?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %session.user_id,
            visitor_id = %visitor_id,
            "Visitor checked out"
        );

        self.visitor_store.get_by_id(&self.db, &visitor_id).await
    }

    /// Log entries for a visitor, oldest first
    pub async fn logs(&self, visitor_id: &str) -> Result<Vec<visitor_log::Model>, InternalError> {
        let visitor = self.visitor_store.get_by_id(&self.db, visitor_id).await?;
        self.visitor_store.list_logs(&self.db, &visitor.id).await
    }

    /// Selectable hosts for the registration form
    pub async fn hosts(&self) -> Result<Vec<user::Model>, InternalError> {
        self.user_store.list_users(&self.db).await
    }

    /// Active access point for a check-in. An unknown id is a bad request,
    /// not a missing resource.
    async fn checkin_access_point(&self, access_point_id: &str) -> Result<access_point::Model, InternalError> {
        self.access_point_store
            .get_active(&self.db, access_point_id)
            .await
            .map_err(unknown_access_point_as_validation)
    }

    async fn known_access_point(&self, access_point_id: &str) -> Result<access_point::Model, InternalError> {
        self.access_point_store
            .get_by_id(&self.db, access_point_id)
            .await
            .map_err(unknown_access_point_as_validation)
    }
}

fn unknown_access_point_as_validation(err: InternalError) -> InternalError {
    match err {
        InternalError::AccessPoint(AccessPointError::AccessPointNotFound { .. }) => {
            InternalError::validation("access_point_id", "unknown access point")
        }
        other => other,
    }
}

fn required_field(field: &str, value: &str) -> Result<String, InternalError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InternalError::validation(field, "must not be blank"));
    }
    Ok(value.to_string())
}

fn optional_field(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_access_point, create_test_user, session_context, setup_test_app_data};
    use crate::types::db::user::Role;

    fn registration() -> RegisterVisitorRequest {
        RegisterVisitorRequest {
            full_name: "Jane Guest".to_string(),
            phone: "+1 555 0100".to_string(),
            purpose: "Interview".to_string(),
            company: Some("  ".to_string()),
            ..Default::default()
        }
    }

    async fn setup() -> (Arc<AppData>, VisitorCoordinator, user::Model, access_point::Model) {
        let app_data = setup_test_app_data().await;
        let coordinator = VisitorCoordinator::new(app_data.clone());
        let staff = create_test_user(&app_data.db, "staff", Role::Staff).await;
        let gate = create_test_access_point(&app_data.db, "Lobby", true).await;
        (app_data, coordinator, staff, gate)
    }

    #[tokio::test]
    async fn test_register_defaults_host_to_caller() {
        let (_app_data, coordinator, staff, _gate) = setup().await;

        let (visitor, code) = coordinator
            .register(&session_context(&staff), registration())
            .await
            .unwrap();

        assert_eq!(visitor.status, VisitorStatus::Registered);
        assert_eq!(visitor.host_user_id.as_deref(), Some(staff.id.as_str()));
        assert_eq!(visitor.registered_by.as_deref(), Some(staff.id.as_str()));
        assert!(visitor.company.is_none());
        assert!(code.starts_with(&visitor.id));
    }

    #[tokio::test]
    async fn test_register_validates_fields_and_host() {
        let (_app_data, coordinator, staff, _gate) = setup().await;
        let ctx = session_context(&staff);

        let mut blank_phone = registration();
        blank_phone.phone = "   ".to_string();
        match coordinator.register(&ctx, blank_phone).await {
            Err(InternalError::Validation { field, .. }) => assert_eq!(field, "phone"),
            other => panic!("Expected Validation, got {:?}", other),
        }

        let mut unknown_host = registration();
        unknown_host.host_user_id = Some("missing".to_string());
        match coordinator.register(&ctx, unknown_host).await {
            Err(InternalError::Visitor(VisitorError::UnknownHost { .. })) => {}
            other => panic!("Expected UnknownHost, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_in_and_out_flow() {
        let (app_data, coordinator, staff, gate) = setup().await;
        let host = create_test_user(&app_data.db, "host", Role::Staff).await;
        let ctx = session_context(&staff);
        let mut request = registration();
        request.host_user_id = Some(host.id.clone());
        let (visitor, _) = coordinator.register(&ctx, request).await.unwrap();
        let payload = coordinator.qr_payload(&visitor.id).await.unwrap();

        let checked_in = coordinator.check_in(&ctx, &payload, &gate.id).await.unwrap();
        assert_eq!(checked_in.status, VisitorStatus::Active);
        assert_eq!(checked_in.access_point_id.as_deref(), Some(gate.id.as_str()));
        assert!(checked_in.checked_in_at.is_some());

        let checked_out = coordinator.check_out(&ctx, &visitor.id, None).await.unwrap();
        assert_eq!(checked_out.status, VisitorStatus::Inactive);
        assert!(checked_out.checked_out_at.is_some());

        let events: Vec<VisitorLogEvent> = coordinator
            .logs(&visitor.id)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.event)
            .collect();
        assert_eq!(events, vec![VisitorLogEvent::CheckIn, VisitorLogEvent::CheckOut]);

        let notes = app_data.notification_store.list_unread(&app_data.db, &host.id).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.visitor_id.as_deref() == Some(visitor.id.as_str())));
    }

    #[tokio::test]
    async fn test_check_in_rejects_invalid_states() {
        let (_app_data, coordinator, staff, gate) = setup().await;
        let ctx = session_context(&staff);
        let (visitor, code) = coordinator.register(&ctx, registration()).await.unwrap();

        match coordinator.check_out(&ctx, &visitor.id, None).await {
            Err(InternalError::Visitor(VisitorError::NotCheckedIn { .. })) => {}
            other => panic!("Expected NotCheckedIn, got {:?}", other),
        }

        coordinator.check_in(&ctx, &code, &gate.id).await.unwrap();
        match coordinator.check_in(&ctx, &code, &gate.id).await {
            Err(InternalError::Visitor(VisitorError::AlreadyCheckedIn { .. })) => {}
            other => panic!("Expected AlreadyCheckedIn, got {:?}", other),
        }

        coordinator.check_out(&ctx, &visitor.id, None).await.unwrap();
        match coordinator.check_in(&ctx, &code, &gate.id).await {
            Err(InternalError::Visitor(VisitorError::AlreadyCheckedOut { .. })) => {}
            other => panic!("Expected AlreadyCheckedOut, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_in_rejects_bad_code_and_access_point() {
        let (app_data, coordinator, staff, gate) = setup().await;
        let ctx = session_context(&staff);
        let (visitor, code) = coordinator.register(&ctx, registration()).await.unwrap();
        let closed = create_test_access_point(&app_data.db, "Back Door", false).await;

        let tampered = format!("{}0", code);
        match coordinator.check_in(&ctx, &tampered, &gate.id).await {
            Err(InternalError::Visitor(VisitorError::InvalidCheckinCode)) => {}
            other => panic!("Expected InvalidCheckinCode, got {:?}", other),
        }
        match coordinator.check_in(&ctx, &code, &closed.id).await {
            Err(InternalError::AccessPoint(AccessPointError::Inactive { .. })) => {}
            other => panic!("Expected Inactive, got {:?}", other),
        }
        match coordinator.check_in(&ctx, &code, "missing").await {
            Err(InternalError::Validation { field, .. }) => assert_eq!(field, "access_point_id"),
            other => panic!("Expected Validation, got {:?}", other),
        }

        let unchanged = app_data.visitor_store.get_by_id(&app_data.db, &visitor.id).await.unwrap();
        assert_eq!(unchanged.status, VisitorStatus::Registered);
    }
}
