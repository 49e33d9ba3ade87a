use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::helpers::{self, BearerAuth};
use crate::coordinators::{AccessPointCoordinator, AuthCoordinator};
use crate::errors::ApiError;
use crate::types::dto::access_point::{
    AccessPointResponse, CreateAccessPointRequest, UpdateAccessPointStatusRequest,
};

const LIST_FAILED: &str = "Failed to fetch access points";
const CREATE_FAILED: &str = "Failed to create access point";
const STATUS_FAILED: &str = "Failed to update access point";

/// Check-in access points
pub struct AccessPointsApi {
    auth_coordinator: Arc<AuthCoordinator>,
    access_point_coordinator: Arc<AccessPointCoordinator>,
}

impl AccessPointsApi {
    pub fn new(
        auth_coordinator: Arc<AuthCoordinator>,
        access_point_coordinator: Arc<AccessPointCoordinator>,
    ) -> Self {
        Self {
            auth_coordinator,
            access_point_coordinator,
        }
    }
}

#[derive(Tags)]
enum AccessPointTags {
    /// Gates and desks where visitors check in
    AccessPoints,
}

#[OpenApi]
impl AccessPointsApi {
    /// All access points, sorted by name
    #[oai(path = "/api/accesspoint/list", method = "get", tag = "AccessPointTags::AccessPoints")]
    async fn list(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<AccessPointResponse>>, ApiError> {
        helpers::session_context(req, &auth, &self.auth_coordinator, LIST_FAILED).await?;

        let access_points = self
            .access_point_coordinator
            .list_access_points()
            .await
            .map_err(|e| ApiError::from_internal_error(e, LIST_FAILED))?;

        Ok(Json(access_points.into_iter().map(Into::into).collect()))
    }

    /// Create an access point. Admin only.
    #[oai(path = "/api/accesspoint", method = "post", tag = "AccessPointTags::AccessPoints")]
    async fn create(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateAccessPointRequest>,
    ) -> Result<Json<AccessPointResponse>, ApiError> {
        let ctx = helpers::admin_context(req, &auth, &self.auth_coordinator, CREATE_FAILED).await?;
        let body = body.0;

        let access_point = self
            .access_point_coordinator
            .create_access_point(&ctx, &body.name, body.location)
            .await
            .map_err(|e| ApiError::from_internal_error(e, CREATE_FAILED))?;

        Ok(Json(access_point.into()))
    }

    /// Enable or disable an access point. Admin only.
    #[oai(path = "/api/accesspoint/:id/status", method = "put", tag = "AccessPointTags::AccessPoints")]
    async fn set_status(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateAccessPointStatusRequest>,
    ) -> Result<Json<AccessPointResponse>, ApiError> {
        let ctx = helpers::admin_context(req, &auth, &self.auth_coordinator, STATUS_FAILED).await?;

        let access_point = self
            .access_point_coordinator
            .set_status(&ctx, &id.0, body.is_active)
            .await
            .map_err(|e| ApiError::from_internal_error(e, STATUS_FAILED))?;

        Ok(Json(access_point.into()))
    }
}
