//! Observability events for arbordb
//!
//! Every line the server logs names one of these events. Events are
//! explicit and typed; each carries its own default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in arbordb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Listener bound, ready to serve
    Serving,
    /// Listener could not be bound (FATAL)
    BindFailed,
    /// Shutdown initiated
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,

    // Connections
    /// Client connected
    ConnectionOpened,
    /// Client disconnected or was dropped
    ConnectionClosed,
    /// Accepting a connection failed
    AcceptFailed,
    /// Request line was not a valid command
    DecodeFailed,

    // Commands
    /// Command completed with an ok response
    CommandExecuted,
    /// Command completed with an error response
    CommandRejected,
    /// Credentials did not check out
    AuthenticationFailed,

    // Namespace
    /// New user registered
    UserRegistered,
    /// Pool created
    PoolCreated,
    /// Schema created
    SchemaCreated,
    /// Collection created
    CollectionCreated,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lifecycle
            Event::BootStart => "ARBORDB_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "ARBORDB_SERVING",
            Event::BindFailed => "BIND_FAILED",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            // Connections
            Event::ConnectionOpened => "CONNECTION_OPENED",
            Event::ConnectionClosed => "CONNECTION_CLOSED",
            Event::AcceptFailed => "ACCEPT_FAILED",
            Event::DecodeFailed => "DECODE_FAILED",

            // Commands
            Event::CommandExecuted => "COMMAND_COMPLETE",
            Event::CommandRejected => "COMMAND_REJECTED",
            Event::AuthenticationFailed => "AUTHENTICATION_FAILED",

            // Namespace
            Event::UserRegistered => "USER_REGISTERED",
            Event::PoolCreated => "POOL_CREATED",
            Event::SchemaCreated => "SCHEMA_CREATED",
            Event::CollectionCreated => "COLLECTION_CREATED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::CommandExecuted => Severity::Trace,
            Event::CommandRejected | Event::AuthenticationFailed | Event::DecodeFailed => {
                Severity::Warn
            }
            Event::AcceptFailed => Severity::Error,
            Event::BindFailed => Severity::Fatal,
            _ => Severity::Info,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
