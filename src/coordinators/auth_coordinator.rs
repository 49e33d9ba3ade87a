use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{CredentialError, UserError};
use crate::services::{PasswordHasherService, TokenService};
use crate::stores::{CredentialStore, UserStore};
use crate::types::db::user;
use crate::types::internal::auth::IssuedTokens;
use crate::types::internal::context::{RequestContext, Session};

/// Authentication coordinator that orchestrates sign-in, sign-out, token
/// refresh, password change and per-request session resolution
pub struct AuthCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    credential_store: Arc<CredentialStore>,
    token_service: Arc<TokenService>,
    password_hasher: Arc<PasswordHasherService>,
}

impl AuthCoordinator {
    /// Create AuthCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            credential_store: app_data.credential_store.clone(),
            token_service: app_data.token_service.clone(),
            password_hasher: app_data.password_hasher.clone(),
        }
    }

    /// Resolve the session behind an access token
    ///
    /// The user is re-loaded on every call, so a deleted user invalidates
    /// outstanding tokens and role changes apply immediately.
    pub async fn resolve_session(&self, access_token: &str) -> Result<Session, InternalError> {
        let claims = self.token_service.validate_jwt(access_token)?;

        let user = self
            .user_store
            .find_by_id(&self.db, &claims.sub)
            .await?
            .ok_or_else(|| CredentialError::invalid_token("jwt", "user no longer exists"))?;

        Ok(Session::from_user(user, claims.exp))
    }

    /// Orchestrate a sign-in
    ///
    /// 1. Look up the user by username
    /// 2. Verify the password
    /// 3. Issue a JWT and a refresh token, storing the refresh token hash
    ///
    /// Unknown usernames and wrong passwords fail identically, and both pay
    /// for one Argon2 pass.
    pub async fn login(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<IssuedTokens, InternalError> {
        let Some(user) = self.user_store.find_by_username(&self.db, username).await? else {
            self.password_hasher.verify_dummy(password)?;
            tracing::warn!(
                request_id = %ctx.request_id,
                ip = ?ctx.ip_address,
                "Sign-in failed: unknown username {}",
                username
            );
            return Err(CredentialError::InvalidCredentials.into());
        };

        if !self.password_hasher.verify(password, &user.password_hash)? {
            tracing::warn!(
                request_id = %ctx.request_id,
                ip = ?ctx.ip_address,
                user_id = %user.id,
                "Sign-in failed: wrong password"
            );
            return Err(CredentialError::InvalidCredentials.into());
        }

        let tokens = self.issue_tokens(&self.db, &user).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            ip = ?ctx.ip_address,
            user_id = %user.id,
            "User signed in"
        );

        Ok(tokens)
    }

    /// Exchange a refresh token for a new access token
    ///
    /// # Returns
    /// * `Ok((access_token, expires_in))`
    pub async fn refresh(
        &self,
        ctx: &RequestContext,
        refresh_token: &str,
    ) -> Result<(String, i64), InternalError> {
        let token_hash = self.token_service.hash_refresh_token(refresh_token)?;

        let user_id = self
            .credential_store
            .validate_refresh_token(&self.db, &token_hash)
            .await?;

        let user = self.user_store.find_by_id(&self.db, &user_id).await?.ok_or_else(|| {
            CredentialError::invalid_token("refresh_token", "user no longer exists")
        })?;

        let (access_token, _claims) = self.token_service.generate_jwt(&user.id, user.role)?;

        tracing::debug!(request_id = %ctx.request_id, user_id = %user.id, "Access token refreshed");

        Ok((access_token, self.token_service.access_token_ttl_seconds()))
    }

    /// Revoke one of the caller's refresh tokens
    pub async fn logout(&self, ctx: &RequestContext, refresh_token: &str) -> Result<(), InternalError> {
        let session = ctx.require_session()?;
        let token_hash = self.token_service.hash_refresh_token(refresh_token)?;

        self.credential_store
            .revoke_refresh_token(&self.db, &token_hash, &session.user_id)
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            ip = ?ctx.ip_address,
            user_id = %session.user_id,
            "User signed out"
        );

        Ok(())
    }

    /// Orchestrate a password change
    ///
    /// Within one transaction the new hash is stored, every refresh token of
    /// the user is revoked and a fresh token pair is issued.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        old_password: &str,
        new_password: &str,
    ) -> Result<IssuedTokens, InternalError> {
        let session = ctx.require_session()?;

        let user = self.user_store.find_by_id(&self.db, &session.user_id).await?.ok_or_else(|| {
            UserError::UserIdNotFound { user_id: session.user_id.clone() }
        })?;

        if !self.password_hasher.verify(old_password, &user.password_hash)? {
            tracing::warn!(
                request_id = %ctx.request_id,
                ip = ?ctx.ip_address,
                user_id = %user.id,
                "Password change failed: incorrect current password"
            );
            return Err(CredentialError::IncorrectPassword.into());
        }

        self.password_hasher.validate(new_password)?;
        let new_hash = self.password_hasher.hash(new_password)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::database("begin_transaction", e))?;

        self.user_store.update_password(&txn, &user.id, new_hash).await?;
        let revoked = self.credential_store.revoke_all_refresh_tokens(&txn, &user.id).await?;
        let tokens = self.issue_tokens(&txn, &user).await?;

        txn.commit()
            .await
            .map_err(|e| InternalError::database("commit_transaction", e))?;

        tracing::info!(
            request_id = %ctx.request_id,
            ip = ?ctx.ip_address,
            user_id = %user.id,
            revoked_refresh_tokens = revoked,
            "Password changed"
        );

        Ok(tokens)
    }

    async fn issue_tokens(
        &self,
        conn: &impl sea_orm::ConnectionTrait,
        user: &user::Model,
    ) -> Result<IssuedTokens, InternalError> {
        let (access_token, _claims) = self.token_service.generate_jwt(&user.id, user.role)?;

        let refresh_token = self.token_service.generate_refresh_token();
        let token_hash = self.token_service.hash_refresh_token(&refresh_token)?;
        let expires_at = self.token_service.get_refresh_expiration();

        self.credential_store
            .store_refresh_token(conn, token_hash, &user.id, expires_at)
            .await?;

        Ok(IssuedTokens {
            access_token,
            refresh_token,
            expires_in: self.token_service.access_token_ttl_seconds(),
        })
    }
}
