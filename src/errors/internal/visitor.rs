use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisitorError {
    #[error("Visitor not found: {visitor_id}")]
    VisitorNotFound { visitor_id: String },

    #[error("Invalid check-in code")]
    InvalidCheckinCode,

    #[error("Host user not found: {user_id}")]
    UnknownHost { user_id: String },

    #[error("Visitor {visitor_id} is already checked in")]
    AlreadyCheckedIn { visitor_id: String },

    #[error("Visitor {visitor_id} has already checked out")]
    AlreadyCheckedOut { visitor_id: String },

    #[error("Visitor {visitor_id} is not checked in")]
    NotCheckedIn { visitor_id: String },
}
