// API layer - HTTP endpoints and page gates
pub mod access_points;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod helpers;
pub mod notifications;
pub mod pages;
pub mod users;
pub mod visitors;

use std::sync::Arc;

use poem::{EndpointExt, IntoEndpoint, Route};
use poem_openapi::OpenApiService;
use poem_openapi::error::AuthorizationError;

pub use access_points::AccessPointsApi;
pub use auth::AuthApi;
pub use dashboard::DashboardApi;
pub use health::HealthApi;
pub use notifications::NotificationsApi;
pub use pages::PagesApi;
pub use users::UsersApi;
pub use visitors::VisitorsApi;

use crate::app_data::AppData;
use crate::coordinators::{
    AccessPointCoordinator, AuthCoordinator, DashboardCoordinator, NotificationCoordinator,
    UserCoordinator, VisitorCoordinator,
};
use crate::errors::ApiError;

/// Compose every API group and page gate into one route tree
///
/// The OpenAPI document and Swagger UI are served under `/swagger`.
pub fn build_routes(app_data: Arc<AppData>) -> Route {
    let public_url = app_data.settings.public_url().to_string();

    let auth_coordinator = Arc::new(AuthCoordinator::new(app_data.clone()));
    let dashboard_coordinator = Arc::new(DashboardCoordinator::new(app_data.clone()));
    let user_coordinator = Arc::new(UserCoordinator::new(app_data.clone()));
    let access_point_coordinator = Arc::new(AccessPointCoordinator::new(app_data.clone()));
    let visitor_coordinator = Arc::new(VisitorCoordinator::new(app_data.clone()));
    let notification_coordinator = Arc::new(NotificationCoordinator::new(app_data.clone()));

    let apis = (
        HealthApi::new(app_data.db.clone()),
        AuthApi::new(auth_coordinator.clone(), &public_url),
        DashboardApi::new(auth_coordinator.clone(), dashboard_coordinator.clone()),
        NotificationsApi::new(auth_coordinator.clone(), notification_coordinator.clone()),
        UsersApi::new(auth_coordinator.clone(), user_coordinator.clone()),
        AccessPointsApi::new(auth_coordinator.clone(), access_point_coordinator.clone()),
        VisitorsApi::new(auth_coordinator.clone(), visitor_coordinator.clone()),
        PagesApi::new(
            auth_coordinator,
            dashboard_coordinator,
            user_coordinator,
            access_point_coordinator,
            visitor_coordinator,
            notification_coordinator,
        ),
    );

    let api_service = OpenApiService::new(apis, "visitdesk", env!("CARGO_PKG_VERSION")).server(public_url);
    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/swagger", ui)
        .nest("/", api_service.into_endpoint().catch_error(missing_bearer))
}

/// Routes guarded by `BearerAuth` answer a missing header with the same JSON
/// error body as every other failure
async fn missing_bearer(_: AuthorizationError) -> ApiError {
    ApiError::missing_token()
}
