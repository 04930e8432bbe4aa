//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::storage::StorageConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Page sizes and chart limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Rows per page for comps, standings, teams and player history.
    /// Defaults to 20; any value in 1..=100 is accepted as an override.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_activity_page_size")]
    pub activity_page_size: u32,

    /// Longest span of the representation chart, in days.
    #[serde(default = "default_series_max_days")]
    pub series_max_days: u32,
}

fn default_page_size() -> u32 {
    20
}

fn default_activity_page_size() -> u32 {
    30
}

fn default_series_max_days() -> u32 {
    100
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            activity_page_size: default_activity_page_size(),
            series_max_days: default_series_max_days(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn storage(&self) -> StorageConfig {
        StorageConfig {
            data_dir: self.data_dir.clone(),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        for (name, size) in [
            ("page_size", self.query.page_size),
            ("activity_page_size", self.query.activity_page_size),
        ] {
            if !(1..=100).contains(&size) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be between 1 and 100, got {}",
                    name, size
                )));
            }
        }

        if self.query.series_max_days == 0 {
            return Err(ConfigError::ValidationError(
                "series_max_days must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
