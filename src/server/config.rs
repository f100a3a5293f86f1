//! Server configuration
//!
//! Loaded from a JSON file; every field has a default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::tree::{DEFAULT_MIN_DEGREE, MAX_MIN_DEGREE};

use super::errors::{ServerError, ServerResult};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Minimum degree for B-tree collections created without one (default: 3)
    #[serde(default = "default_btree_min_degree")]
    pub btree_min_degree: usize,

    /// Minimum password length at registration (default: 8)
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    /// Lowest severity written to the log (default: "INFO")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Longest accepted request line, newline excluded (default: 1 MiB)
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_btree_min_degree() -> usize {
    DEFAULT_MIN_DEGREE
}

fn default_min_password_length() -> usize {
    8
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_max_line_bytes() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            btree_min_degree: default_btree_min_degree(),
            min_password_length: default_min_password_length(),
            log_level: default_log_level(),
            max_line_bytes: default_max_line_bytes(),
        }
    }
}

impl ServerConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ServerResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ServerError::config_error(format!("failed to read config: {}", e)))?;

        let config: ServerConfig = serde_json::from_str(&content)
            .map_err(|e| ServerError::config_error(format!("invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Default config bound to `port`
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Check field ranges
    pub fn validate(&self) -> ServerResult<()> {
        if self.host.trim().is_empty() {
            return Err(ServerError::config_error("host must not be empty"));
        }

        if !(2..=MAX_MIN_DEGREE).contains(&self.btree_min_degree) {
            return Err(ServerError::config_error(format!(
                "btree_min_degree must be in 2..={}, got {}",
                MAX_MIN_DEGREE, self.btree_min_degree
            )));
        }

        if self.max_line_bytes == 0 {
            return Err(ServerError::config_error("max_line_bytes must be > 0"));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> ServerResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(ServerError::config_error)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::server::ServerErrorCode;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        assert_eq!(config.btree_min_degree, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_object_takes_defaults() {
        let file = write_config("{}");
        assert_eq!(ServerConfig::load(file.path()).unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_load_overrides() {
        let file = write_config(r#"{"host": "127.0.0.1", "port": 9000, "btree_min_degree": 4}"#);
        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:9000");
        assert_eq!(config.btree_min_degree, 4);
    }

    #[test]
    fn test_rejects_small_degree() {
        let file = write_config(r#"{"btree_min_degree": 1}"#);
        let err = ServerConfig::load(file.path()).unwrap_err();
        assert_eq!(err.code(), ServerErrorCode::ConfigError);
        assert!(err.message().contains("btree_min_degree"));

        let file = write_config(r#"{"btree_min_degree": 1000000}"#);
        let err = ServerConfig::load(file.path()).unwrap_err();
        assert!(err.message().contains("btree_min_degree"));
    }

    #[test]
    fn test_max_line_bytes() {
        assert_eq!(ServerConfig::default().max_line_bytes, 1024 * 1024);

        let file = write_config(r#"{"max_line_bytes": 4096}"#);
        assert_eq!(ServerConfig::load(file.path()).unwrap().max_line_bytes, 4096);

        let file = write_config(r#"{"max_line_bytes": 0}"#);
        assert!(ServerConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_rejects_unknown_fields_and_levels() {
        let file = write_config(r#"{"data_dir": "/tmp"}"#);
        assert!(ServerConfig::load(file.path()).is_err());

        let file = write_config(r#"{"log_level": "chatty"}"#);
        assert!(ServerConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServerConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.message().contains("failed to read config"));
    }
}
