//! # Auth Errors
//!
//! Error types for the authentication module.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and registration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    // ==================
    // Authentication Errors
    // ==================
    
    /// No user is registered under the given name
    #[error("user not found")]
    UserNotFound,
    
    /// Password did not match the stored hash
    #[error("invalid password")]
    InvalidPassword,
    
    // ==================
    // Registration Errors
    // ==================
    
    /// Username already registered
    #[error("user already exists")]
    UserAlreadyExists,
    
    /// Username is empty
    #[error("username cannot be empty")]
    EmptyUsername,
    
    /// Role name is not one of superuser, admin, editor, user
    #[error("unknown role: {0}")]
    UnknownRole(String),
    
    /// Password does not meet requirements
    #[error("password does not meet requirements: {0}")]
    WeakPassword(String),
    
    // ==================
    // Internal Errors
    // ==================
    
    /// Password hashing failed
    #[error("internal error: password hashing failed")]
    HashingFailed,
    
    /// Storage operation failed
    #[error("storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UserNotFound => "ARBOR_USER_NOT_FOUND",
            AuthError::InvalidPassword => "ARBOR_INVALID_PASSWORD",
            AuthError::UserAlreadyExists => "ARBOR_USER_EXISTS",
            AuthError::EmptyUsername => "ARBOR_EMPTY_NAME",
            AuthError::UnknownRole(_) => "ARBOR_UNKNOWN_ROLE",
            AuthError::WeakPassword(_) => "ARBOR_WEAK_PASSWORD",
            AuthError::HashingFailed => "ARBOR_HASHING_FAILED",
            AuthError::StorageError(_) => "ARBOR_AUTH_STORAGE",
        }
    }
    
    /// Returns whether the caller, not the server, is at fault
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::HashingFailed | AuthError::StorageError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_messages_match_wire_text() {
        assert_eq!(AuthError::UserNotFound.to_string(), "user not found");
        assert_eq!(AuthError::InvalidPassword.to_string(), "invalid password");
        assert_eq!(AuthError::UserAlreadyExists.to_string(), "user already exists");
    }
    
    #[test]
    fn test_client_vs_server_errors() {
        assert!(AuthError::InvalidPassword.is_client_error());
        assert!(AuthError::UnknownRole("root".to_string()).is_client_error());
        assert!(!AuthError::HashingFailed.is_client_error());
        assert!(!AuthError::StorageError("x".to_string()).is_client_error());
    }
}
