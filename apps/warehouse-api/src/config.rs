//! # Server Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WAREHOUSE_PORT=8080                                                │
//! │     WAREHOUSE_STORAGE=memory                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     first CLI argument, or WAREHOUSE_CONFIG, or                        │
//! │     ~/.config/warehouse/warehouse.toml (Linux)                         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:5000, SQLite in the platform data directory                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # warehouse.toml
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 5000
//!
//! [database]
//! storage = "sqlite"  # sqlite | memory
//! path = "/var/lib/warehouse/warehouse.db"
//! max_connections = 5
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

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

// =============================================================================
// Storage Kind
// =============================================================================

/// Which [`warehouse_db::ProductStore`] backs the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// SQLite file via sqlx.
    #[default]
    Sqlite,
    /// Process memory; everything is lost on shutdown.
    Memory,
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StorageKind::Sqlite),
            "memory" | "in-memory" => Ok(StorageKind::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "storage".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Sqlite => f.write_str("sqlite"),
            StorageKind::Memory => f.write_str("memory"),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Interface to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub storage: StorageKind,

    /// SQLite file. Ignored for in-memory storage.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            storage: StorageKind::default(),
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// `<data dir>/warehouse.db`, or `./warehouse.db` when the platform has no
/// home directory.
fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("com", "warehouse", "catalog")
        .map(|dirs| dirs.data_dir().join("warehouse.db"))
        .unwrap_or_else(|| PathBuf::from("warehouse.db"))
}

fn default_max_connections() -> u32 {
    5
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl ServerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `explicit_path`, else `WAREHOUSE_CONFIG`, else the
    ///    platform config dir. Only an explicitly named file must exist.
    /// 3. Environment variables
    pub fn load(explicit_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let explicit_path =
            explicit_path.or_else(|| std::env::var("WAREHOUSE_CONFIG").ok().map(PathBuf::from));

        let mut config = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(path)?,
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path, source })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `WAREHOUSE_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("WAREHOUSE_BIND_ADDR") {
            debug!(bind_addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("WAREHOUSE_PORT") {
            self.server.port = parse_env("WAREHOUSE_PORT", &port)?;
        }

        if let Some(storage) = lookup("WAREHOUSE_STORAGE") {
            self.database.storage = parse_env("WAREHOUSE_STORAGE", &storage)?;
        }

        if let Some(path) = lookup("WAREHOUSE_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("WAREHOUSE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_env("WAREHOUSE_MAX_CONNECTIONS", &max)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("port must be greater than 0".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// `bind_addr:port`, ready for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "warehouse", "catalog")
            .map(|dirs| dirs.config_dir().join("warehouse.toml"))
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
