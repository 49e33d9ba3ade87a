use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use std::fmt;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Argon2id password hashing with a server-side pepper
pub struct PasswordHasherService {
    password_pepper: String,
}

impl PasswordHasherService {
    pub fn new(password_pepper: String) -> Self {
        Self { password_pepper }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Check length bounds for a new password
    pub fn validate(&self, password: &str) -> Result<(), InternalError> {
        let length = password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(CredentialError::PasswordValidationFailed(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ))
            .into());
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(CredentialError::PasswordValidationFailed(format!(
                "Password must be at most {} characters",
                MAX_PASSWORD_LENGTH
            ))
            .into());
        }
        Ok(())
    }

    pub fn hash(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Returns false for a wrong password or an unparseable stored hash
    pub fn verify(&self, password: &str, password_hash: &str) -> Result<bool, InternalError> {
        let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
            tracing::warn!("Stored password hash could not be parsed");
            return Ok(false);
        };

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// One Argon2 pass with the same parameters as `verify`, result discarded
    ///
    /// Sign-in runs this when the username does not exist, so that branch
    /// costs as much as a wrong password.
    pub fn verify_dummy(&self, password: &str) -> Result<(), InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let _ = self.argon2()?.hash_password(password.as_bytes(), &salt);
        Ok(())
    }
}

impl fmt::Debug for PasswordHasherService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasherService")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
