use poem_openapi::Object;

use crate::types::db::access_point;

/// Entry point where visitors check in
#[derive(Object, Debug, Clone)]
pub struct AccessPointResponse {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

impl From<access_point::Model> for AccessPointResponse {
    fn from(model: access_point::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            location: model.location,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct CreateAccessPointRequest {
    pub name: String,
    pub location: Option<String>,
}

#[derive(Object, Debug)]
pub struct UpdateAccessPointStatusRequest {
    pub is_active: bool,
}
