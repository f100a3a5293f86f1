//! Namespace error types
//!
//! Error codes:
//! - ARBOR_POOL_NOT_FOUND, ARBOR_SCHEMA_NOT_FOUND, ARBOR_COLLECTION_NOT_FOUND
//! - ARBOR_POOL_EXISTS, ARBOR_SCHEMA_EXISTS, ARBOR_COLLECTION_EXISTS
//! - ARBOR_PERMISSION_DENIED
//! - ARBOR_EMPTY_NAME, ARBOR_INVALID_NAME
//! - ARBOR_UNKNOWN_TREE_TYPE, ARBOR_INVALID_DEGREE
//! - ARBOR_LOCK_POISONED

use std::fmt;

/// Namespace-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceErrorCode {
    PoolNotFound,
    SchemaNotFound,
    CollectionNotFound,
    PoolExists,
    SchemaExists,
    CollectionExists,
    /// Permission gate refused the operation
    PermissionDenied,
    EmptyName,
    /// Name holds something other than letters, digits, `_` or `-`
    InvalidName,
    UnknownTreeType,
    /// B-tree minimum degree outside the accepted range
    InvalidDegree,
    LockPoisoned,
}

impl NamespaceErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            NamespaceErrorCode::PoolNotFound => "ARBOR_POOL_NOT_FOUND",
            NamespaceErrorCode::SchemaNotFound => "ARBOR_SCHEMA_NOT_FOUND",
            NamespaceErrorCode::CollectionNotFound => "ARBOR_COLLECTION_NOT_FOUND",
            NamespaceErrorCode::PoolExists => "ARBOR_POOL_EXISTS",
            NamespaceErrorCode::SchemaExists => "ARBOR_SCHEMA_EXISTS",
            NamespaceErrorCode::CollectionExists => "ARBOR_COLLECTION_EXISTS",
            NamespaceErrorCode::PermissionDenied => "ARBOR_PERMISSION_DENIED",
            NamespaceErrorCode::EmptyName => "ARBOR_EMPTY_NAME",
            NamespaceErrorCode::InvalidName => "ARBOR_INVALID_NAME",
            NamespaceErrorCode::UnknownTreeType => "ARBOR_UNKNOWN_TREE_TYPE",
            NamespaceErrorCode::InvalidDegree => "ARBOR_INVALID_DEGREE",
            NamespaceErrorCode::LockPoisoned => "ARBOR_LOCK_POISONED",
        }
    }

    /// Client-facing message
    pub fn message(&self) -> &'static str {
        match self {
            NamespaceErrorCode::PoolNotFound => "pool not found",
            NamespaceErrorCode::SchemaNotFound => "schema not found",
            NamespaceErrorCode::CollectionNotFound => "collection not found",
            NamespaceErrorCode::PoolExists => "pool already exists",
            NamespaceErrorCode::SchemaExists => "schema already exists",
            NamespaceErrorCode::CollectionExists => "collection already exists",
            NamespaceErrorCode::PermissionDenied => "permission denied",
            NamespaceErrorCode::EmptyName => "name cannot be empty",
            NamespaceErrorCode::InvalidName => "name contains invalid characters",
            NamespaceErrorCode::UnknownTreeType => "unknown tree type",
            NamespaceErrorCode::InvalidDegree => "invalid b-tree minimum degree",
            NamespaceErrorCode::LockPoisoned => "namespace lock poisoned",
        }
    }
}

impl fmt::Display for NamespaceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Namespace error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceError {
    code: NamespaceErrorCode,
    detail: Option<String>,
}

impl NamespaceError {
    /// Error carrying only its code's message
    pub fn new(code: NamespaceErrorCode) -> Self {
        Self { code, detail: None }
    }

    /// Error naming the entity it concerns
    pub fn with_detail(code: NamespaceErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: Some(detail.into()),
        }
    }

    pub fn unknown_tree_type(tree_type: &str) -> Self {
        Self::with_detail(NamespaceErrorCode::UnknownTreeType, tree_type)
    }

    pub fn invalid_degree(min_degree: usize) -> Self {
        Self::with_detail(NamespaceErrorCode::InvalidDegree, min_degree.to_string())
    }

    pub fn lock_poisoned() -> Self {
        Self::new(NamespaceErrorCode::LockPoisoned)
    }

    /// Returns the error code
    pub fn code(&self) -> NamespaceErrorCode {
        self.code
    }

    /// Client-facing message; never includes the detail.
    pub fn message(&self) -> &'static str {
        self.code.message()
    }

    /// Entity the error concerns, if recorded
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {} ({})", self.code, self.message(), detail),
            None => write!(f, "{}: {}", self.code, self.message()),
        }
    }
}

impl std::error::Error for NamespaceError {}

/// Result type for namespace operations
pub type NamespaceResult<T> = Result<T, NamespaceError>;
