//! # API Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MEDLOCUS_PORT=8080                                                 │
//! │     MEDLOCUS_DATABASE_PATH=/var/lib/medlocus/medlocus.db               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $MEDLOCUS_CONFIG, or ./medlocus.toml                               │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:5000, ./medlocus.db                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # medlocus.toml
//! bind_addr = "127.0.0.1"
//! port = 5000
//! database_path = "./data/medlocus.db"
//! max_connections = 5
//! busy_timeout_ms = 5000
//! log = "medlocus_api=info,medlocus_db=info,tower_http=info"
//! ```

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use medlocus_db::DbConfig;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "MEDLOCUS_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "medlocus.toml";

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Interface to listen on.
    pub bind_addr: String,

    /// TCP port. Default: 5000, where the dashboard expects the API.
    pub port: u16,

    /// SQLite database file, created on first start.
    pub database_path: PathBuf,

    /// Pool size.
    pub max_connections: u32,

    /// How long a sale waits for another writer before giving up.
    pub busy_timeout_ms: u64,

    /// Default tracing filter when `RUST_LOG` is unset.
    pub log: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
            database_path: PathBuf::from("./medlocus.db"),
            max_connections: 5,
            busy_timeout_ms: 5_000,
            log: "medlocus_api=info,medlocus_db=info,tower_http=info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`$MEDLOCUS_CONFIG` or `./medlocus.toml`), if present
    /// 3. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Reads a TOML file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(toml::from_str(&contents)?)
    }

    /// Applies `MEDLOCUS_*` overrides from `lookup`.
    ///
    /// Unparseable numbers are errors rather than silently ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("MEDLOCUS_BIND_ADDR") {
            self.bind_addr = addr;
        }

        if let Some(port) = lookup("MEDLOCUS_PORT") {
            debug!(%port, "Overriding port from environment");
            self.port = parse_value("MEDLOCUS_PORT", &port)?;
        }

        if let Some(path) = lookup("MEDLOCUS_DATABASE_PATH") {
            debug!(%path, "Overriding database path from environment");
            self.database_path = PathBuf::from(path);
        }

        if let Some(max) = lookup("MEDLOCUS_MAX_CONNECTIONS") {
            self.max_connections = parse_value("MEDLOCUS_MAX_CONNECTIONS", &max)?;
        }

        if let Some(filter) = lookup("MEDLOCUS_LOG") {
            self.log = filter;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.parse::<IpAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                key: "bind_addr".to_string(),
                value: self.bind_addr.clone(),
            });
        }

        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be greater than 0".into()));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database_path is required".into()));
        }

        Ok(())
    }

    /// `addr:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Pool settings for [`medlocus_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ApiConfig = toml::from_str(
            r#"
            port = 8080
            database_path = "/tmp/pharmacy.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("/tmp/pharmacy.db"));
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.busy_timeout_ms, 5_000);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("medlocus-no-such-config.toml");
        assert_eq!(ApiConfig::from_file(&path).unwrap(), ApiConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: ApiConfig = toml::from_str("port = 8080").unwrap();

        config
            .apply_overrides(env(&[
                ("MEDLOCUS_PORT", "9090"),
                ("MEDLOCUS_BIND_ADDR", "127.0.0.1"),
                ("MEDLOCUS_MAX_CONNECTIONS", "12"),
                ("MEDLOCUS_LOG", "debug"),
            ]))
            .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.log, "debug");
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let mut config = ApiConfig::default();
        let err = config
            .apply_overrides(env(&[("MEDLOCUS_PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "MEDLOCUS_PORT"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = ApiConfig::default();

        config.max_connections = 0;
        assert!(config.validate().is_err());

        config.max_connections = 5;
        config.bind_addr = "localhost:5000".to_string();
        assert!(config.validate().is_err());

        config.bind_addr = "::1".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_toml_type_rejected() {
        assert!(toml::from_str::<ApiConfig>("port = \"five thousand\"").is_err());
    }
}
