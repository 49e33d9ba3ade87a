use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::helpers::{self, BearerAuth};
use crate::coordinators::{AuthCoordinator, VisitorCoordinator};
use crate::errors::ApiError;
use crate::types::dto::visitor::{
    CheckInRequest, CheckOutRequest, RegisterVisitorRequest, VisitorLogResponse, VisitorQrResponse,
    VisitorResponse,
};

const REGISTER_FAILED: &str = "Failed to register visitor";
const FETCH_FAILED: &str = "Failed to fetch visitor";
const QR_FAILED: &str = "Failed to generate QR code";
const CHECKIN_FAILED: &str = "Failed to check in visitor";
const CHECKOUT_FAILED: &str = "Failed to check out visitor";
const LOGS_FAILED: &str = "Failed to fetch visitor logs";

/// Visitor registration and QR check-in
pub struct VisitorsApi {
    auth_coordinator: Arc<AuthCoordinator>,
    visitor_coordinator: Arc<VisitorCoordinator>,
}

impl VisitorsApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, visitor_coordinator: Arc<VisitorCoordinator>) -> Self {
        Self {
            auth_coordinator,
            visitor_coordinator,
        }
    }
}

#[derive(Tags)]
enum VisitorTags {
    /// Visitor registration and check-in
    Visitors,
}

#[OpenApi]
impl VisitorsApi {
    /// Register a visitor
    ///
    /// The host defaults to the caller. The response carries the check-in code.
    #[oai(path = "/api/visitors", method = "post", tag = "VisitorTags::Visitors")]
    async fn register(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<RegisterVisitorRequest>,
    ) -> Result<Json<VisitorResponse>, ApiError> {
        let ctx = helpers::session_context(req, &auth, &self.auth_coordinator, REGISTER_FAILED).await?;

        let (visitor, code) = self
            .visitor_coordinator
            .register(&ctx, body.0)
            .await
            .map_err(|e| ApiError::from_internal_error(e, REGISTER_FAILED))?;

        Ok(Json(VisitorResponse::from(visitor).with_checkin_code(code)))
    }

    /// Check a visitor in with a scanned QR payload or raw check-in code
    #[oai(path = "/api/visitors/checkin", method = "post", tag = "VisitorTags::Visitors")]
    async fn check_in(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CheckInRequest>,
    ) -> Result<Json<VisitorResponse>, ApiError> {
        let ctx = helpers::session_context(req, &auth, &self.auth_coordinator, CHECKIN_FAILED).await?;

        let visitor = self
            .visitor_coordinator
            .check_in(&ctx, &body.code, &body.access_point_id)
            .await
            .map_err(|e| ApiError::from_internal_error(e, CHECKIN_FAILED))?;

        Ok(Json(visitor.into()))
    }

    /// Visitor with its check-in code
    #[oai(path = "/api/visitors/:id", method = "get", tag = "VisitorTags::Visitors")]
    async fn get(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<Json<VisitorResponse>, ApiError> {
        helpers::session_context(req, &auth, &self.auth_coordinator, FETCH_FAILED).await?;

        let (visitor, code) = self
            .visitor_coordinator
            .get_visitor(&id.0)
            .await
            .map_err(|e| ApiError::from_internal_error(e, FETCH_FAILED))?;

        Ok(Json(VisitorResponse::from(visitor).with_checkin_code(code)))
    }

    /// QR payload for a visitor
    #[oai(path = "/api/visitors/:id/qr", method = "get", tag = "VisitorTags::Visitors")]
    async fn qr(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<Json<VisitorQrResponse>, ApiError> {
        helpers::session_context(req, &auth, &self.auth_coordinator, QR_FAILED).await?;

        let payload = self
            .visitor_coordinator
            .qr_payload(&id.0)
            .await
            .map_err(|e| ApiError::from_internal_error(e, QR_FAILED))?;

        Ok(Json(VisitorQrResponse {
            visitor_id: id.0,
            payload,
        }))
    }

    /// Check an active visitor out
    #[oai(path = "/api/visitors/:id/checkout", method = "post", tag = "VisitorTags::Visitors")]
    async fn check_out(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<CheckOutRequest>,
    ) -> Result<Json<VisitorResponse>, ApiError> {
        let ctx = helpers::session_context(req, &auth, &self.auth_coordinator, CHECKOUT_FAILED).await?;

        let visitor = self
            .visitor_coordinator
            .check_out(&ctx, &id.0, body.0.access_point_id)
            .await
            .map_err(|e| ApiError::from_internal_error(e, CHECKOUT_FAILED))?;

        Ok(Json(visitor.into()))
    }

    /// Check-in and check-out log of a visitor, oldest first
    #[oai(path = "/api/visitors/:id/logs", method = "get", tag = "VisitorTags::Visitors")]
    async fn logs(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<Vec<VisitorLogResponse>>, ApiError> {
        helpers::session_context(req, &auth, &self.auth_coordinator, LOGS_FAILED).await?;

        let logs = self
            .visitor_coordinator
            .logs(&id.0)
            .await
            .map_err(|e| ApiError::from_internal_error(e, LOGS_FAILED))?;

        Ok(Json(logs.into_iter().map(Into::into).collect()))
    }
}
