use std::net::IpAddr;

use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;

use super::{request_id::RequestId, session::Session};

/// Request context that flows through API, coordinator and store layers
///
/// Carries what logging needs (client IP, request id) and the resolved
/// session, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Session when the bearer token was valid
    pub session: Option<Session>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            session: None,
        }
    }

    /// Create an unauthenticated context from an HTTP request
    pub fn from_request(req: &Request) -> Self {
        Self {
            ip_address: Self::extract_ip_address(req),
            request_id: RequestId::new(),
            session: None,
        }
    }

    /// Bearer token from the Authorization header, if well-formed
    pub fn extract_bearer(req: &Request) -> Option<Bearer> {
        Bearer::from_request(req).ok()
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Proxy/load balancer
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // nginx
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.trim().parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Session of the caller, or an invalid token error when unauthenticated
    pub fn require_session(&self) -> Result<&Session, InternalError> {
        self.session
            .as_ref()
            .ok_or_else(|| CredentialError::invalid_token("jwt", "no session").into())
    }

    /// Actor id for logs: the session user, or "anonymous"
    pub fn actor_id(&self) -> &str {
        self.session
            .as_ref()
            .map(|s| s.user_id.as_str())
            .unwrap_or("anonymous")
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
