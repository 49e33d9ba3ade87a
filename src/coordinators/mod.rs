// Coordinators layer - Workflow orchestration
//
// Coordinators compose store and service operations for specific API
// endpoints and page gates.

pub mod access_point_coordinator;
pub mod auth_coordinator;
pub mod dashboard_coordinator;
pub mod notification_coordinator;
pub mod user_coordinator;
pub mod visitor_coordinator;

pub use access_point_coordinator::AccessPointCoordinator;
pub use auth_coordinator::AuthCoordinator;
pub use dashboard_coordinator::DashboardCoordinator;
pub use notification_coordinator::NotificationCoordinator;
pub use user_coordinator::UserCoordinator;
pub use visitor_coordinator::VisitorCoordinator;
