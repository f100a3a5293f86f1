//! API error types
//!
//! API errors are pass-through: they keep the code and client-facing
//! message of the subsystem error they wrap.

use std::fmt;

use crate::auth::AuthError;
use crate::collection::CollectionError;
use crate::namespace::NamespaceError;

/// API-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Request line is not a valid command
    ArborInvalidRequest,
    /// Unknown operation
    ArborUnknownOperation,
    /// Credentials rejected
    ArborAuthenticationFailed,
}

impl ApiErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::ArborInvalidRequest => "ARBOR_INVALID_REQUEST",
            ApiErrorCode::ArborUnknownOperation => "ARBOR_UNKNOWN_OPERATION",
            ApiErrorCode::ArborAuthenticationFailed => "ARBOR_AUTHENTICATION_FAILED",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// API error with preserved subsystem error information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Original error code string (from subsystem or API)
    code: String,
    /// Client-facing message
    message: String,
}

impl ApiError {
    /// Create an invalid request error
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::ArborInvalidRequest.code().to_string(),
            message: reason.into(),
        }
    }

    /// Create an unknown operation error
    pub fn unknown_operation(op: &str) -> Self {
        Self {
            code: ApiErrorCode::ArborUnknownOperation.code().to_string(),
            message: format!("unknown operation: {}", op),
        }
    }

    /// Wrap a credential failure
    pub fn authentication_failed(err: &AuthError) -> Self {
        Self {
            code: ApiErrorCode::ArborAuthenticationFailed.code().to_string(),
            message: format!("authentication failed: {}", err),
        }
    }

    /// Create from an auth error (pass-through)
    pub fn from_auth_error(err: AuthError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    /// Create from a namespace error (pass-through)
    pub fn from_namespace_error(err: NamespaceError) -> Self {
        Self {
            code: err.code().code().to_string(),
            message: err.message().to_string(),
        }
    }

    /// Create from a collection error (pass-through)
    pub fn from_collection_error(err: CollectionError) -> Self {
        Self {
            code: err.code().code().to_string(),
            message: err.message().to_string(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<NamespaceError> for ApiError {
    fn from(err: NamespaceError) -> Self {
        Self::from_namespace_error(err)
    }
}

impl From<CollectionError> for ApiError {
    fn from(err: CollectionError) -> Self {
        Self::from_collection_error(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::from_auth_error(err)
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::NamespaceErrorCode;

    #[test]
    fn test_invalid_request_error() {
        let err = ApiError::invalid_request("missing field");
        assert_eq!(err.code(), "ARBOR_INVALID_REQUEST");
    }

    #[test]
    fn test_unknown_operation_error() {
        let err = ApiError::unknown_operation("drop");
        assert_eq!(err.code(), "ARBOR_UNKNOWN_OPERATION");
        assert_eq!(err.message(), "unknown operation: drop");
    }

    #[test]
    fn test_authentication_failed_wraps_cause() {
        let err = ApiError::authentication_failed(&AuthError::InvalidPassword);
        assert_eq!(err.message(), "authentication failed: invalid password");
    }

    #[test]
    fn test_namespace_pass_through_keeps_message() {
        let err: ApiError = NamespaceError::new(NamespaceErrorCode::PoolExists).into();
        assert_eq!(err.code(), "ARBOR_POOL_EXISTS");
        assert_eq!(err.message(), "pool already exists");
    }
}
