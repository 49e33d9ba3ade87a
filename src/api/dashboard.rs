use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers::{self, BearerAuth};
use crate::coordinators::{AuthCoordinator, DashboardCoordinator};
use crate::errors::ApiError;
use crate::types::dto::dashboard::DashboardSummary;
use crate::types::dto::visitor::VisitorResponse;

const ACTIVE_FAILED: &str = "Failed to fetch active visitors";
const UNACTIVE_FAILED: &str = "Failed to fetch unactive visitors";
const SUMMARY_FAILED: &str = "Failed to fetch dashboard summary";

/// Dashboard visitor lists
pub struct DashboardApi {
    auth_coordinator: Arc<AuthCoordinator>,
    dashboard_coordinator: Arc<DashboardCoordinator>,
}

impl DashboardApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, dashboard_coordinator: Arc<DashboardCoordinator>) -> Self {
        Self {
            auth_coordinator,
            dashboard_coordinator,
        }
    }
}

#[derive(Tags)]
enum DashboardTags {
    /// Visitor overviews
    Dashboard,
}

#[OpenApi(prefix_path = "/api/dashboard")]
impl DashboardApi {
    /// Visitors currently checked in
    #[oai(path = "/active", method = "get", tag = "DashboardTags::Dashboard")]
    async fn active(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<VisitorResponse>>, ApiError> {
        helpers::session_context(req, &auth, &self.auth_coordinator, ACTIVE_FAILED).await?;

        let visitors = self
            .dashboard_coordinator
            .active_visitors()
            .await
            .map_err(|e| ApiError::from_internal_error(e, ACTIVE_FAILED))?;

        Ok(Json(visitors.into_iter().map(Into::into).collect()))
    }

    /// Visitors not checked in: registered and checked out
    #[oai(path = "/unactive", method = "get", tag = "DashboardTags::Dashboard")]
    async fn unactive(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<VisitorResponse>>, ApiError> {
        helpers::session_context(req, &auth, &self.auth_coordinator, UNACTIVE_FAILED).await?;

        let visitors = self
            .dashboard_coordinator
            .unactive_visitors()
            .await
            .map_err(|e| ApiError::from_internal_error(e, UNACTIVE_FAILED))?;

        Ok(Json(visitors.into_iter().map(Into::into).collect()))
    }

    /// Visitor counts by status
    #[oai(path = "/summary", method = "get", tag = "DashboardTags::Dashboard")]
    async fn summary(&self, req: &Request, auth: BearerAuth) -> Result<Json<DashboardSummary>, ApiError> {
        helpers::session_context(req, &auth, &self.auth_coordinator, SUMMARY_FAILED).await?;

        let summary = self
            .dashboard_coordinator
            .summary()
            .await
            .map_err(|e| ApiError::from_internal_error(e, SUMMARY_FAILED))?;

        Ok(Json(summary))
    }
}
