use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers::BearerAuth;
use crate::coordinators::AuthCoordinator;
use crate::errors::AuthError;
use crate::types::dto::auth::{
    ChangePasswordRequest, LoginRequest, LogoutRequest, RefreshRequest, RefreshResponse,
    SessionResponse, SignInDescriptor, TokenResponse,
};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::auth::IssuedTokens;
use crate::types::internal::context::RequestContext;

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: Arc<AuthCoordinator>,
    signin_url: String,
}

impl AuthApi {
    /// `public_url` is where clients reach this server; it forms the sign-in
    /// post URL
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, public_url: &str) -> Self {
        Self {
            auth_coordinator,
            signin_url: format!("{}/api/auth/signin", public_url),
        }
    }

    async fn authenticated(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, AuthError> {
        let session = self
            .auth_coordinator
            .resolve_session(&auth.0.token)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(RequestContext::from_request(req).with_session(session))
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

fn token_response(tokens: IssuedTokens) -> Json<TokenResponse> {
    Json(TokenResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expires_in,
    })
}

#[OpenApi(prefix_path = "/api/auth")]
impl AuthApi {
    /// Sign in with username and password to receive authentication tokens
    #[oai(path = "/signin", method = "post", tag = "AuthTags::Authentication")]
    async fn signin(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let ctx = RequestContext::from_request(req);

        let tokens = self
            .auth_coordinator
            .login(&ctx, &body.username, &body.password)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(token_response(tokens))
    }

    /// Describe how to sign in
    ///
    /// Unauthenticated page requests are redirected here.
    #[oai(path = "/signin", method = "get", tag = "AuthTags::Authentication")]
    async fn signin_form(&self) -> Json<SignInDescriptor> {
        Json(SignInDescriptor {
            method: "POST".to_string(),
            action: self.signin_url.clone(),
            fields: vec!["username".to_string(), "password".to_string()],
        })
    }

    /// Current session
    #[oai(path = "/session", method = "get", tag = "AuthTags::Authentication")]
    async fn session(&self, req: &Request, auth: BearerAuth) -> Result<Json<SessionResponse>, AuthError> {
        let ctx = self.authenticated(req, &auth).await?;
        let session = ctx.session.ok_or_else(AuthError::invalid_token)?;

        Ok(Json(SessionResponse {
            user_id: session.user_id,
            username: session.username,
            full_name: session.full_name,
            role: session.role.into(),
            expires_at: session.expires_at,
        }))
    }

    /// Refresh access token using a refresh token
    #[oai(path = "/refresh", method = "post", tag = "AuthTags::Authentication")]
    async fn refresh(&self, req: &Request, body: Json<RefreshRequest>) -> Result<Json<RefreshResponse>, AuthError> {
        let ctx = RequestContext::from_request(req);

        let (access_token, expires_in) = self
            .auth_coordinator
            .refresh(&ctx, &body.refresh_token)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(RefreshResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }))
    }

    /// Sign out by revoking one of the caller's refresh tokens
    #[oai(path = "/signout", method = "post", tag = "AuthTags::Authentication")]
    async fn signout(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<LogoutRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = self.authenticated(req, &auth).await?;

        self.auth_coordinator
            .logout(&ctx, &body.refresh_token)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(MessageResponse {
            message: "Signed out".to_string(),
        }))
    }

    /// Change the caller's password
    ///
    /// Revokes every refresh token of the caller and returns a new token pair.
    #[oai(path = "/password", method = "post", tag = "AuthTags::Authentication")]
    async fn change_password(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<TokenResponse>, AuthError> {
        let ctx = self.authenticated(req, &auth).await?;

        let tokens = self
            .auth_coordinator
            .change_password(&ctx, &body.old_password, &body.new_password)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(token_response(tokens))
    }
}
