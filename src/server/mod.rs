//! Network server for arbordb
//!
//! A tokio TCP listener speaking newline-delimited JSON, plus its
//! configuration file.

mod config;
mod errors;
#[allow(clippy::module_inception)]
mod server;

pub use config::ServerConfig;
pub use errors::{ServerError, ServerErrorCode, ServerResult};
pub use server::{Server, ShutdownHandle};
