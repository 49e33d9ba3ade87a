use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::db::refresh_token;

/// Refresh token persistence. Only HMAC hashes of tokens are stored.
#[derive(Debug, Default)]
pub struct CredentialStore;

impl CredentialStore {
    pub fn new() -> Self {
        Self
    }

    /// Store a refresh token hash for a user
    pub async fn store_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: String,
        user_id: &str,
        expires_at: i64,
    ) -> Result<(), InternalError> {
        let new_token = refresh_token::ActiveModel {
            token_hash: Set(token_hash),
            user_id: Set(user_id.to_string()),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now().timestamp()),
        };

        new_token
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("store_refresh_token", e))?;

        Ok(())
    }

    /// Validate a refresh token hash and return the owning user_id
    ///
    /// # Returns
    /// * `Ok(String)` - The user_id if the token exists and has not expired
    /// * `Err(CredentialError::InvalidToken)` - Unknown token
    /// * `Err(CredentialError::ExpiredToken)` - Expired token (it is deleted)
    pub async fn validate_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
    ) -> Result<String, InternalError> {
        let token = refresh_token::Entity::find_by_id(token_hash.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("validate_refresh_token", e))?
            .ok_or_else(|| CredentialError::invalid_token("refresh_token", "not found"))?;

        if token.expires_at < Utc::now().timestamp() {
            refresh_token::Entity::delete_by_id(token.token_hash)
                .exec(conn)
                .await
                .map_err(|e| InternalError::database("delete_expired_refresh_token", e))?;
            return Err(CredentialError::ExpiredToken("refresh_token".to_string()).into());
        }

        Ok(token.user_id)
    }

    /// Revoke a refresh token, only if it belongs to `user_id`
    pub async fn revoke_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
        user_id: &str,
    ) -> Result<(), InternalError> {
        let result = refresh_token::Entity::delete_many()
            .filter(refresh_token::Column::TokenHash.eq(token_hash))
            .filter(refresh_token::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("revoke_refresh_token", e))?;

        if result.rows_affected == 0 {
            return Err(CredentialError::invalid_token("refresh_token", "not found for user").into());
        }

        Ok(())
    }

    /// Revoke every refresh token of a user and return how many were removed
    pub async fn revoke_all_refresh_tokens(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<u64, InternalError> {
        let result = refresh_token::Entity::delete_many()
            .filter(refresh_token::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("revoke_all_refresh_tokens", e))?;

        Ok(result.rows_affected)
    }
}
