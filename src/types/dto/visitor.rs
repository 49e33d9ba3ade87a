use poem_openapi::{Enum, Object};

use crate::types::db::visitor::{self, VisitorStatus};
use crate::types::db::visitor_log::{self, VisitorLogEvent};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
pub enum VisitorStatusDto {
    Registered,
    Active,
    Inactive,
}

impl From<VisitorStatus> for VisitorStatusDto {
    fn from(status: VisitorStatus) -> Self {
        match status {
            VisitorStatus::Registered => VisitorStatusDto::Registered,
            VisitorStatus::Active => VisitorStatusDto::Active,
            VisitorStatus::Inactive => VisitorStatusDto::Inactive,
        }
    }
}

/// Request to register a visitor
#[derive(Object, Debug, Default)]
pub struct RegisterVisitorRequest {
    pub full_name: String,
    pub phone: String,
    pub purpose: String,
    pub email: Option<String>,
    pub company: Option<String>,

    /// Staff member being visited. Defaults to the caller.
    pub host_user_id: Option<String>,

    /// Expected arrival (Unix timestamp)
    pub expected_at: Option<i64>,
}

/// Visitor record
#[derive(Object, Debug, Clone)]
pub struct VisitorResponse {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub purpose: String,
    pub host_user_id: Option<String>,
    pub registered_by: Option<String>,
    pub status: VisitorStatusDto,
    pub expected_at: Option<i64>,
    pub checked_in_at: Option<i64>,
    pub checked_out_at: Option<i64>,
    pub access_point_id: Option<String>,
    pub created_at: i64,

    /// Signed code carried in the visitor's QR code. Only set on single-visitor reads.
    pub checkin_code: Option<String>,
}

impl From<visitor::Model> for VisitorResponse {
    fn from(model: visitor::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            phone: model.phone,
            email: model.email,
            company: model.company,
            purpose: model.purpose,
            host_user_id: model.host_user_id,
            registered_by: model.registered_by,
            status: model.status.into(),
            expected_at: model.expected_at,
            checked_in_at: model.checked_in_at,
            checked_out_at: model.checked_out_at,
            access_point_id: model.access_point_id,
            created_at: model.created_at,
            checkin_code: None,
        }
    }
}

impl VisitorResponse {
    pub fn with_checkin_code(mut self, code: String) -> Self {
        self.checkin_code = Some(code);
        self
    }
}

/// QR check-in request
#[derive(Object, Debug)]
pub struct CheckInRequest {
    /// Scanned QR payload or the raw check-in code
    pub code: String,
    pub access_point_id: String,
}

#[derive(Object, Debug, Default)]
pub struct CheckOutRequest {
    pub access_point_id: Option<String>,
}

/// Content to encode in the visitor's QR code
#[derive(Object, Debug)]
pub struct VisitorQrResponse {
    pub visitor_id: String,
    pub payload: String,
}

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "snake_case")]
pub enum VisitorLogEventDto {
    CheckIn,
    CheckOut,
}

impl From<VisitorLogEvent> for VisitorLogEventDto {
    fn from(event: VisitorLogEvent) -> Self {
        match event {
            VisitorLogEvent::CheckIn => VisitorLogEventDto::CheckIn,
            VisitorLogEvent::CheckOut => VisitorLogEventDto::CheckOut,
        }
    }
}

#[derive(Object, Debug)]
pub struct VisitorLogResponse {
    pub id: i32,
    pub visitor_id: String,
    pub access_point_id: Option<String>,
    pub event: VisitorLogEventDto,
    pub recorded_by: Option<String>,
    pub recorded_at: i64,
}

impl From<visitor_log::Model> for VisitorLogResponse {
    fn from(model: visitor_log::Model) -> Self {
        Self {
            id: model.id,
            visitor_id: model.visitor_id,
            access_point_id: model.access_point_id,
            event: model.event.into(),
            recorded_by: model.recorded_by,
            recorded_at: model.recorded_at,
        }
    }
}
