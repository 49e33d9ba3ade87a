use poem::Request;
use poem_openapi::SecurityScheme;
use poem_openapi::auth::Bearer;

use crate::coordinators::AuthCoordinator;
use crate::errors::ApiError;
use crate::types::internal::context::RequestContext;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// Build a request context carrying the caller's session
///
/// Token failures map to 401. Infrastructure failures map to a 500 with
/// `fallback_message`.
pub async fn session_context(
    req: &Request,
    auth: &BearerAuth,
    auth_coordinator: &AuthCoordinator,
    fallback_message: &str,
) -> Result<RequestContext, ApiError> {
    let ctx = RequestContext::from_request(req);

    let session = auth_coordinator
        .resolve_session(&auth.0.token)
        .await
        .map_err(|e| ApiError::from_internal_error(e, fallback_message))?;

    Ok(ctx.with_session(session))
}

/// Like `session_context`, but the session must belong to an admin
pub async fn admin_context(
    req: &Request,
    auth: &BearerAuth,
    auth_coordinator: &AuthCoordinator,
    fallback_message: &str,
) -> Result<RequestContext, ApiError> {
    let ctx = session_context(req, auth, auth_coordinator, fallback_message).await?;
    require_admin(&ctx)?;
    Ok(ctx)
}

/// Reject sessions without the admin role
pub fn require_admin(ctx: &RequestContext) -> Result<(), ApiError> {
    match &ctx.session {
        Some(session) if session.is_admin() => Ok(()),
        _ => {
            tracing::warn!(
                request_id = %ctx.request_id,
                ip = ?ctx.ip_address,
                actor = %ctx.actor_id(),
                "Admin route denied"
            );
            Err(ApiError::admin_required())
        }
    }
}
