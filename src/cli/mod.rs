//! CLI module for arbordb
//!
//! Provides command-line interface for:
//! - serve: Start the TCP server
//! - check-config: Validate a configuration file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_config, load_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
