//! # Password Hashing
//!
//! Passwords are only ever stored as Argon2id hashes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::errors::{AuthError, AuthResult};

/// Password requirements configuration
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_number: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_number: false,
        }
    }
}

impl PasswordPolicy {
    /// Policy with only a length requirement
    pub fn with_min_length(min_length: usize) -> Self {
        Self {
            min_length,
            ..Default::default()
        }
    }

    /// Validate a password against this policy
    pub fn validate(&self, password: &str) -> AuthResult<()> {
        validate_password(password, self)
    }
}

/// Validate password against policy
pub fn validate_password(password: &str, policy: &PasswordPolicy) -> AuthResult<()> {
    if password.chars().count() < policy.min_length {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {} characters",
            policy.min_length
        )));
    }

    if policy.require_number && !password.chars().any(|c| c.is_numeric()) {
        return Err(AuthError::WeakPassword(
            "password must contain at least one number".to_string(),
        ));
    }

    Ok(())
}

/// Hash a password using Argon2id with a fresh salt
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::HashingFailed)
}

/// Verify a password against its PHC-encoded hash
///
/// Comparison is constant-time inside the argon2 crate.
pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::StorageError(format!("corrupt password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
