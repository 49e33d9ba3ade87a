pub mod request_context;
pub mod request_id;
pub mod session;

pub use {request_context::RequestContext, request_id::RequestId, session::Session};
