//! Collection error types
//!
//! Error codes:
//! - ARBOR_KEY_NOT_FOUND
//! - ARBOR_UNKNOWN_TREE_TYPE
//! - ARBOR_LOCK_POISONED

use std::fmt;

use super::collection::Status;

/// Collection-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionErrorCode {
    /// Key is not stored in the collection
    KeyNotFound,
    /// Tree type selector is not one of avl, redblack, btree
    UnknownTreeType,
    /// A writer panicked while holding the collection lock
    LockPoisoned,
}

impl CollectionErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            CollectionErrorCode::KeyNotFound => "ARBOR_KEY_NOT_FOUND",
            CollectionErrorCode::UnknownTreeType => "ARBOR_UNKNOWN_TREE_TYPE",
            CollectionErrorCode::LockPoisoned => "ARBOR_LOCK_POISONED",
        }
    }
}

impl fmt::Display for CollectionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Collection error with context
#[derive(Debug, Clone)]
pub struct CollectionError {
    code: CollectionErrorCode,
    message: String,
}

impl CollectionError {
    /// Key lookup failed
    pub fn key_not_found(key: &str) -> Self {
        Self {
            code: CollectionErrorCode::KeyNotFound,
            message: format!("key not found: {}", key),
        }
    }

    /// Unrecognized tree type selector
    pub fn unknown_tree_type(name: &str) -> Self {
        Self {
            code: CollectionErrorCode::UnknownTreeType,
            message: format!("unknown tree type: {}", name),
        }
    }

    /// Collection lock was poisoned
    pub fn lock_poisoned() -> Self {
        Self {
            code: CollectionErrorCode::LockPoisoned,
            message: "collection lock poisoned".to_string(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> CollectionErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wire status for errors that are reported in-band.
    ///
    /// A poisoned lock has no status; it is surfaced as a failed request.
    pub fn status(&self) -> Option<Status> {
        match self.code {
            CollectionErrorCode::KeyNotFound => Some(Status::NotFound),
            CollectionErrorCode::UnknownTreeType => Some(Status::UnknownTreeType),
            CollectionErrorCode::LockPoisoned => None,
        }
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CollectionError {}

/// Result type for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CollectionErrorCode::KeyNotFound.code(), "ARBOR_KEY_NOT_FOUND");
        assert_eq!(CollectionErrorCode::UnknownTreeType.code(), "ARBOR_UNKNOWN_TREE_TYPE");
    }

    #[test]
    fn test_in_band_status() {
        assert_eq!(CollectionError::key_not_found("k").status(), Some(Status::NotFound));
        assert_eq!(CollectionError::lock_poisoned().status(), None);
    }

    #[test]
    fn test_error_display() {
        let display = CollectionError::key_not_found("alpha").to_string();
        assert!(display.contains("ARBOR_KEY_NOT_FOUND"));
        assert!(display.contains("alpha"));
    }
}
