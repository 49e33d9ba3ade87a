use poem_openapi::{Object, Union};

use crate::types::dto::access_point::AccessPointResponse;
use crate::types::dto::dashboard::DashboardSummary;
use crate::types::dto::notification::NotificationResponse;
use crate::types::dto::user::{RoleDto, UserResponse};
use crate::types::dto::visitor::VisitorResponse;
use crate::types::internal::context::Session;

/// Signed-in user shown in every page header
#[derive(Object, Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
    pub username: String,
    pub full_name: String,
    pub role: RoleDto,
}

impl From<&Session> for SessionUser {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id.clone(),
            username: session.username.clone(),
            full_name: session.full_name.clone(),
            role: session.role.into(),
        }
    }
}

/// Selectable host in the registration form
#[derive(Object, Debug, Clone)]
pub struct HostOption {
    pub id: String,
    pub full_name: String,
}

#[derive(Object, Debug)]
pub struct DashboardPage {
    pub user: SessionUser,
    pub summary: DashboardSummary,
    pub active_visitors: Vec<VisitorResponse>,
    pub unread_notifications: u64,
}

#[derive(Object, Debug)]
pub struct UsersPage {
    pub user: SessionUser,
    pub users: Vec<UserResponse>,
}

#[derive(Object, Debug)]
pub struct AccessPointsPage {
    pub user: SessionUser,
    pub access_points: Vec<AccessPointResponse>,
}

#[derive(Object, Debug)]
pub struct RegisterVisitorPage {
    pub user: SessionUser,
    pub hosts: Vec<HostOption>,
    pub access_points: Vec<AccessPointResponse>,
}

#[derive(Object, Debug)]
pub struct ScanPage {
    pub user: SessionUser,
    pub access_points: Vec<AccessPointResponse>,
}

#[derive(Object, Debug)]
pub struct NotificationsPage {
    pub user: SessionUser,
    pub notifications: Vec<NotificationResponse>,
}

/// Data behind a page, tagged by `page`
#[derive(Union, Debug)]
#[oai(discriminator_name = "page")]
pub enum PageData {
    #[oai(mapping = "dashboard")]
    Dashboard(DashboardPage),
    #[oai(mapping = "users")]
    Users(UsersPage),
    #[oai(mapping = "accesspoints")]
    AccessPoints(AccessPointsPage),
    #[oai(mapping = "register_visitor")]
    RegisterVisitor(RegisterVisitorPage),
    #[oai(mapping = "scan")]
    Scan(ScanPage),
    #[oai(mapping = "notifications")]
    Notifications(NotificationsPage),
}
