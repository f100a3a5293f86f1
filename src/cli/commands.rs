//! CLI command implementations

use std::path::Path;

use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::server::{Server, ServerConfig};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Load the configuration file, or defaults when no path is given
pub fn load_config(config_path: Option<&Path>, port: Option<u16>) -> CliResult<ServerConfig> {
    let mut config = match config_path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = port {
        config.port = port;
    }
    Ok(config)
}

/// Start the server and block until Ctrl-C
///
/// Startup sequence:
/// 1. Configuration load
/// 2. Log threshold
/// 3. Runtime and listener
/// 4. Serve until interrupted
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    log_event(Event::BootStart);

    let config = load_config(config_path, port)?;
    Logger::set_min_severity(config.severity()?);
    let addr = config.socket_addr();
    log_event_with_fields(Event::ConfigLoaded, &[("addr", addr.as_str())]);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let server = Server::from_config(config);
        let listener = server.bind().await?;

        let shutdown = server.shutdown_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.shutdown();
            }
        });

        server.serve(listener).await.map_err(CliError::from)
    })
}

/// Validate a configuration file and print the effective settings
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = load_config(Some(config_path), None)?;
    write_response(serde_json::to_value(&config)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::cli::CliErrorCode;

    #[test]
    fn test_port_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"port": 7000, "host": "127.0.0.1"}"#).unwrap();

        let config = load_config(Some(file.path()), Some(7100)).unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:7100");

        let config = load_config(None, None).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_check_config_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"btree_min_degree": 0}"#).unwrap();

        let err = check_config(file.path()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
