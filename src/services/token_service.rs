use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use rand::prelude::*;
use std::fmt;
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::services::crypto;
use crate::types::db::user::Role;
use crate::types::internal::auth::Claims;

/// Manages JWT generation and validation, and refresh token material
pub struct TokenService {
    jwt_secret: String,
    jwt_expiration_minutes: i64,
    refresh_expiration_days: i64,
    refresh_token_secret: String,
}

impl TokenService {
    pub fn new(
        jwt_secret: String,
        refresh_token_secret: String,
        jwt_expiration_minutes: i64,
        refresh_expiration_days: i64,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_expiration_minutes,
            refresh_expiration_days,
            refresh_token_secret,
        }
    }

    /// Lifetime of an access token in seconds
    pub fn access_token_ttl_seconds(&self) -> i64 {
        self.jwt_expiration_minutes * 60
    }

    /// Generate a JWT for the given user
    ///
    /// # Returns
    /// * `Ok((token, claims))` - The encoded JWT and the claims it carries
    pub fn generate_jwt(&self, user_id: &str, role: Role) -> Result<(String, Claims), InternalError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            exp: now + self.access_token_ttl_seconds(),
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_encode", e.to_string()))?;

        Ok((token, claims))
    }

    /// Validate a JWT and return the claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => CredentialError::ExpiredToken("jwt".to_string()),
            _ => CredentialError::invalid_token("jwt", e.to_string()),
        })?;

        Ok(token_data.claims)
    }

    /// Generate a cryptographically secure refresh token
    ///
    /// # Returns
    /// * `String` - A base64-encoded random token (32 bytes)
    pub fn generate_refresh_token(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        general_purpose::STANDARD.encode(random_bytes)
    }

    /// Hash a refresh token using HMAC-SHA256
    pub fn hash_refresh_token(&self, token: &str) -> Result<String, InternalError> {
        crypto::hmac_sha256_hex(&self.refresh_token_secret, token)
    }

    /// Expiration timestamp for a refresh token issued now
    pub fn get_refresh_expiration(&self) -> i64 {
        Utc::now().timestamp() + (self.refresh_expiration_days * 24 * 60 * 60)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("refresh_expiration_days", &self.refresh_expiration_days)
            .field("refresh_token_secret", &"<redacted>")
            .finish()
    }
}
