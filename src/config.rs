//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the tariff search server: server binding,
//! dataset table locations and searchable fields, search behavior, and
//! logging, with validation and type-safe access to all settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration file (TOML), environment variables, CLI arguments
//! - **Output**: Validated configuration structs with defaults and overrides
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)
//!
//! The per-dataset searchable field list lives here rather than in code: the
//! column sets of the source spreadsheets have shifted between revisions, so
//! the matcher treats them as configuration.

use crate::errors::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Dataset table files and search fields
    pub datasets: DatasetsConfig,
    /// Search engine behavior
    pub search: SearchConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable permissive CORS for browser clients
    pub enable_cors: bool,
}

/// Location and search configuration for one dataset table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFileConfig {
    /// JSON table file exported from the source spreadsheet
    pub path: PathBuf,
    /// Fields the matcher searches, in order; the first is the prefix field
    pub search_fields: Vec<String>,
}

/// The four reference tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetsConfig {
    pub gtip: DatasetFileConfig,
    pub izahname: DatasetFileConfig,
    pub tarife: DatasetFileConfig,
    #[serde(rename = "esya-fihristi")]
    pub esya_fihristi: DatasetFileConfig,
}

impl DatasetsConfig {
    /// Iterate datasets with their API path identifiers
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DatasetFileConfig)> {
        [
            ("gtip", &self.gtip),
            ("izahname", &self.izahname),
            ("tarife", &self.tarife),
            ("esya-fihristi", &self.esya_fihristi),
        ]
        .into_iter()
    }

    /// Mutable variant of [`DatasetsConfig::iter`]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&'static str, &mut DatasetFileConfig)> {
        [
            ("gtip", &mut self.gtip),
            ("izahname", &mut self.izahname),
            ("tarife", &mut self.tarife),
            ("esya-fihristi", &mut self.esya_fihristi),
        ]
        .into_iter()
    }
}

/// Search engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Radius of the explanatory-notes context window
    pub context_radius: usize,
    /// Enable the memoizing query cache
    pub enable_query_cache: bool,
    /// Query cache size (number of entries)
    pub query_cache_size: usize,
    /// Query cache TTL in seconds
    pub query_cache_ttl_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("TARIFF_SEARCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("TARIFF_SEARCH_PORT") {
            self.server.port = port.parse().map_err(|_| SearchError::Config {
                message: "Invalid port number in TARIFF_SEARCH_PORT".to_string(),
            })?;
        }
        if let Ok(data_dir) = std::env::var("TARIFF_SEARCH_DATA_DIR") {
            let dir = PathBuf::from(data_dir);
            for (_, file) in self.datasets.iter_mut() {
                if let Some(name) = file.path.file_name() {
                    file.path = dir.join(name);
                }
            }
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(SearchError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        for (id, file) in self.datasets.iter() {
            if file.search_fields.is_empty() {
                return Err(SearchError::ValidationFailed {
                    field: format!("datasets.{}.search_fields", id),
                    reason: "At least one searchable field is required".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            datasets: DatasetsConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 10000,
            enable_cors: true,
        }
    }
}

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            gtip: DatasetFileConfig {
                path: PathBuf::from("data/gtip.json"),
                search_fields: vec!["Kod".to_string(), "Tanım".to_string()],
            },
            izahname: DatasetFileConfig {
                path: PathBuf::from("data/izahname.json"),
                search_fields: vec!["paragraf".to_string()],
            },
            tarife: DatasetFileConfig {
                path: PathBuf::from("data/tarife.json"),
                search_fields: vec!["1. Kolon".to_string(), "2. Kolon".to_string()],
            },
            esya_fihristi: DatasetFileConfig {
                path: PathBuf::from("data/esya_fihristi.json"),
                search_fields: vec![
                    "Eşya".to_string(),
                    "Armonize Sistem".to_string(),
                    "İzahname Notları".to_string(),
                ],
            },
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            context_radius: crate::context::DEFAULT_CONTEXT_RADIUS,
            enable_query_cache: true,
            query_cache_size: 1000,
            query_cache_ttl_seconds: 3600,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}
