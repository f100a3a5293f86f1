//! Server error types

use std::fmt;
use std::io;

/// Server error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerErrorCode {
    /// Configuration missing, malformed or out of range
    ConfigError,
    /// Listener could not be bound
    BindFailed,
    /// Socket I/O failed
    IoError,
    /// Dispatch task panicked or was cancelled
    DispatchFailed,
}

impl ServerErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "ARBOR_CONFIG_ERROR",
            Self::BindFailed => "ARBOR_BIND_FAILED",
            Self::IoError => "ARBOR_IO_ERROR",
            Self::DispatchFailed => "ARBOR_DISPATCH_FAILED",
        }
    }
}

/// Server error
#[derive(Debug)]
pub struct ServerError {
    code: ServerErrorCode,
    message: String,
}

impl ServerError {
    pub fn new(code: ServerErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(ServerErrorCode::ConfigError, msg)
    }

    pub fn bind_failed(addr: &str, err: io::Error) -> Self {
        Self::new(
            ServerErrorCode::BindFailed,
            format!("failed to bind {}: {}", addr, err),
        )
    }

    pub fn dispatch_failed(msg: impl Into<String>) -> Self {
        Self::new(ServerErrorCode::DispatchFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> ServerErrorCode {
        self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ServerError {}

impl From<io::Error> for ServerError {
    fn from(e: io::Error) -> Self {
        Self::new(ServerErrorCode::IoError, e.to_string())
    }
}

/// Server result type
pub type ServerResult<T> = Result<T, ServerError>;
