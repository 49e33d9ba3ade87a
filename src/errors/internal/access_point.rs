use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessPointError {
    #[error("Access point not found: {access_point_id}")]
    AccessPointNotFound { access_point_id: String },

    #[error("Access point already exists: {name}")]
    DuplicateName { name: String },

    #[error("Access point is inactive: {access_point_id}")]
    Inactive { access_point_id: String },
}
