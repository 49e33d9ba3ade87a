use std::sync::Arc;

use poem::Request;
use poem_openapi::{ApiResponse, OpenApi, Tags, payload::Json};

use crate::coordinators::{
    AccessPointCoordinator, AuthCoordinator, DashboardCoordinator, NotificationCoordinator,
    UserCoordinator, VisitorCoordinator,
};
use crate::errors::InternalError;
use crate::types::dto::access_point::AccessPointResponse;
use crate::types::dto::common::ErrorResponse;
use crate::types::dto::page::{
    AccessPointsPage, DashboardPage, HostOption, NotificationsPage, PageData, RegisterVisitorPage,
    ScanPage, SessionUser, UsersPage,
};
use crate::types::internal::context::RequestContext;

pub const SIGNIN_PATH: &str = "/api/auth/signin";
pub const UNAUTHORIZED_PATH: &str = "/errors/unauthorized";
pub const DASHBOARD_PATH: &str = "/dashboard";

const PAGE_FAILED: &str = "Failed to load page";

/// Result of a page gate
#[derive(ApiResponse, Debug)]
pub enum PageResponse {
    /// Data shown by the page
    #[oai(status = 200)]
    Ok(Json<PageData>),

    /// Sign-in required, role missing, or page moved
    #[oai(status = 302)]
    Redirect(#[oai(header = "Location")] String),

    /// Internal server error with a fixed message
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl PageResponse {
    fn redirect(location: &str) -> Self {
        PageResponse::Redirect(location.to_string())
    }

    fn from_internal_error(err: InternalError) -> Self {
        tracing::error!("{}: {}", PAGE_FAILED, err);
        PageResponse::InternalError(ErrorResponse::json("internal_error", PAGE_FAILED, 500))
    }
}

#[derive(ApiResponse, Debug)]
pub enum UnauthorizedPageResponse {
    /// The signed-in user may not open the requested page
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PageAccess {
    SignedIn,
    Admin,
}

/// Page gates: JSON stand-ins for server-rendered pages
///
/// Each gate applies the page's session and role redirects, then returns
/// the data the page shows.
pub struct PagesApi {
    auth_coordinator: Arc<AuthCoordinator>,
    dashboard_coordinator: Arc<DashboardCoordinator>,
    user_coordinator: Arc<UserCoordinator>,
    access_point_coordinator: Arc<AccessPointCoordinator>,
    visitor_coordinator: Arc<VisitorCoordinator>,
    notification_coordinator: Arc<NotificationCoordinator>,
}

impl PagesApi {
    pub fn new(
        auth_coordinator: Arc<AuthCoordinator>,
        dashboard_coordinator: Arc<DashboardCoordinator>,
        user_coordinator: Arc<UserCoordinator>,
        access_point_coordinator: Arc<AccessPointCoordinator>,
        visitor_coordinator: Arc<VisitorCoordinator>,
        notification_coordinator: Arc<NotificationCoordinator>,
    ) -> Self {
        Self {
            auth_coordinator,
            dashboard_coordinator,
            user_coordinator,
            access_point_coordinator,
            visitor_coordinator,
            notification_coordinator,
        }
    }

    /// Resolve the session for a page, or the response that replaces the page
    async fn gate(&self, req: &Request, access: PageAccess) -> Result<RequestContext, PageResponse> {
        let ctx = RequestContext::from_request(req);

        let Some(bearer) = RequestContext::extract_bearer(req) else {
            return Err(PageResponse::redirect(SIGNIN_PATH));
        };

        let session = match self.auth_coordinator.resolve_session(&bearer.token).await {
            Ok(session) => session,
            Err(err) if err.is_infrastructure() => return Err(PageResponse::from_internal_error(err)),
            Err(err) => {
                tracing::debug!(request_id = %ctx.request_id, "Page session rejected: {}", err);
                return Err(PageResponse::redirect(SIGNIN_PATH));
            }
        };

        if access == PageAccess::Admin && !session.is_admin() {
            tracing::warn!(
                request_id = %ctx.request_id,
                ip = ?ctx.ip_address,
                actor = %session.user_id,
                "Admin page denied"
            );
            return Err(PageResponse::redirect(UNAUTHORIZED_PATH));
        }

        Ok(ctx.with_session(session))
    }

    async fn dashboard_page(&self, ctx: &RequestContext) -> Result<PageData, InternalError> {
        let user = SessionUser::from(ctx.require_session()?);

        Ok(PageData::Dashboard(DashboardPage {
            user,
            summary: self.dashboard_coordinator.summary().await?,
            active_visitors: into_responses(self.dashboard_coordinator.active_visitors().await?),
            unread_notifications: self.notification_coordinator.count_unread(ctx).await?,
        }))
    }

    async fn register_visitor_page(&self, ctx: &RequestContext) -> Result<PageData, InternalError> {
        let user = SessionUser::from(ctx.require_session()?);

        let hosts = self
            .visitor_coordinator
            .hosts()
            .await?
            .into_iter()
            .map(|u| HostOption { id: u.id, full_name: u.full_name })
            .collect();

        Ok(PageData::RegisterVisitor(RegisterVisitorPage {
            user,
            hosts,
            access_points: self.active_access_points().await?,
        }))
    }

    async fn scan_page(&self, ctx: &RequestContext) -> Result<PageData, InternalError> {
        Ok(PageData::Scan(ScanPage {
            user: SessionUser::from(ctx.require_session()?),
            access_points: self.active_access_points().await?,
        }))
    }

    async fn notifications_page(&self, ctx: &RequestContext) -> Result<PageData, InternalError> {
        Ok(PageData::Notifications(NotificationsPage {
            user: SessionUser::from(ctx.require_session()?),
            notifications: into_responses(self.notification_coordinator.list_recent(ctx).await?),
        }))
    }

    async fn users_page(&self, ctx: &RequestContext) -> Result<PageData, InternalError> {
        Ok(PageData::Users(UsersPage {
            user: SessionUser::from(ctx.require_session()?),
            users: into_responses(self.user_coordinator.list_users().await?),
        }))
    }

    async fn access_points_page(&self, ctx: &RequestContext) -> Result<PageData, InternalError> {
        Ok(PageData::AccessPoints(AccessPointsPage {
            user: SessionUser::from(ctx.require_session()?),
            access_points: into_responses(self.access_point_coordinator.list_access_points().await?),
        }))
    }

    async fn active_access_points(&self) -> Result<Vec<AccessPointResponse>, InternalError> {
        Ok(self
            .access_point_coordinator
            .list_access_points()
            .await?
            .into_iter()
            .filter(|a| a.is_active)
            .map(Into::into)
            .collect())
    }
}

fn into_responses<M, R: From<M>>(models: Vec<M>) -> Vec<R> {
    models.into_iter().map(R::from).collect()
}

fn render(result: Result<PageData, InternalError>) -> PageResponse {
    match result {
        Ok(data) => PageResponse::Ok(Json(data)),
        Err(err) => PageResponse::from_internal_error(err),
    }
}

#[derive(Tags)]
enum PageTags {
    /// Page gates
    Pages,
}

#[OpenApi]
impl PagesApi {
    /// Entry point: signed-in users go to the dashboard
    #[oai(path = "/", method = "get", tag = "PageTags::Pages")]
    async fn index(&self, req: &Request) -> PageResponse {
        match self.gate(req, PageAccess::SignedIn).await {
            Ok(_) => PageResponse::redirect(DASHBOARD_PATH),
            Err(response) => response,
        }
    }

    /// Dashboard: visitor counts, visitors on site, unread notification count
    #[oai(path = "/dashboard", method = "get", tag = "PageTags::Pages")]
    async fn dashboard(&self, req: &Request) -> PageResponse {
        match self.gate(req, PageAccess::SignedIn).await {
            Ok(ctx) => render(self.dashboard_page(&ctx).await),
            Err(response) => response,
        }
    }

    /// Visitor registration form data
    #[oai(path = "/visitors/register", method = "get", tag = "PageTags::Pages")]
    async fn register_visitor(&self, req: &Request) -> PageResponse {
        match self.gate(req, PageAccess::SignedIn).await {
            Ok(ctx) => render(self.register_visitor_page(&ctx).await),
            Err(response) => response,
        }
    }

    /// QR scanner data
    #[oai(path = "/scan", method = "get", tag = "PageTags::Pages")]
    async fn scan(&self, req: &Request) -> PageResponse {
        match self.gate(req, PageAccess::SignedIn).await {
            Ok(ctx) => render(self.scan_page(&ctx).await),
            Err(response) => response,
        }
    }

    /// Recent notifications of the signed-in user
    #[oai(path = "/notifications", method = "get", tag = "PageTags::Pages")]
    async fn notifications(&self, req: &Request) -> PageResponse {
        match self.gate(req, PageAccess::SignedIn).await {
            Ok(ctx) => render(self.notifications_page(&ctx).await),
            Err(response) => response,
        }
    }

    /// User management. Admin only.
    #[oai(path = "/users", method = "get", tag = "PageTags::Pages")]
    async fn users(&self, req: &Request) -> PageResponse {
        match self.gate(req, PageAccess::Admin).await {
            Ok(ctx) => render(self.users_page(&ctx).await),
            Err(response) => response,
        }
    }

    /// Access point management. Admin only.
    #[oai(path = "/accesspoints", method = "get", tag = "PageTags::Pages")]
    async fn access_points(&self, req: &Request) -> PageResponse {
        match self.gate(req, PageAccess::Admin).await {
            Ok(ctx) => render(self.access_points_page(&ctx).await),
            Err(response) => response,
        }
    }

    /// Shown when a signed-in user opens a page their role does not allow
    #[oai(path = "/errors/unauthorized", method = "get", tag = "PageTags::Pages")]
    async fn unauthorized(&self) -> UnauthorizedPageResponse {
        UnauthorizedPageResponse::Forbidden(ErrorResponse::json(
            "unauthorized",
            "You are not authorized to view this page",
            403,
        ))
    }
}
