//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file, then `RESTDB_*` environment
//! variables override individual keys. Every key has a default, so an empty
//! file (or no file at all) is a valid configuration.
//!
//! ```yaml
//! host: 0.0.0.0
//! port: 3000
//! db_path: db.json
//! route_prefix: api
//! id_strategy: timestamp
//! matching:
//!   prefix_fields: [title]
//!   nested_field: bookmarks
//!   nested_text_field: title
//! cors:
//!   enabled: true
//!   origins: "*"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// How identifiers of created records are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// `{resource}_{unix_millis}`
    #[default]
    Timestamp,
    /// Random v4 UUID
    Uuid,
}

/// Field matching rules of the query engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Text fields filtered by prefix instead of substring
    pub prefix_fields: Vec<String>,

    /// Record field holding the nested collection
    pub nested_field: String,

    /// Child field searched when filtering parents by it
    pub nested_text_field: String,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            prefix_fields: vec!["title".to_string()],
            nested_field: "bookmarks".to_string(),
            nested_text_field: "title".to_string(),
        }
    }
}

/// CORS policy, as comma-separated lists or `*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: String,
    pub methods: String,
    pub headers: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: "*".to_string(),
            methods: "GET,POST,PUT,DELETE,PATCH,OPTIONS".to_string(),
            headers: "Content-Type,Authorization".to_string(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// JSON file holding the store
    pub db_path: PathBuf,

    /// Leading path segment stripped from every request (e.g. `api`)
    pub route_prefix: Option<String>,

    pub id_strategy: IdStrategy,

    pub matching: MatchConfig,

    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            db_path: PathBuf::from("db.json"),
            route_prefix: Some("api".to_string()),
            id_strategy: IdStrategy::default(),
            matching: MatchConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from an optional file, then apply process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `RESTDB_*` overrides read through `lookup`
    ///
    /// Recognized keys: `RESTDB_HOST`, `RESTDB_PORT`, `RESTDB_DB_PATH`,
    /// `RESTDB_ROUTE_PREFIX` (empty disables the prefix), `RESTDB_ID_STRATEGY`
    /// and `RESTDB_CORS_ORIGINS`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("RESTDB_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("RESTDB_PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "RESTDB_PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(path) = lookup("RESTDB_DB_PATH") {
            self.db_path = PathBuf::from(path);
        }
        if let Some(prefix) = lookup("RESTDB_ROUTE_PREFIX") {
            let prefix = prefix.trim().trim_matches('/').to_string();
            self.route_prefix = (!prefix.is_empty()).then_some(prefix);
        }
        if let Some(strategy) = lookup("RESTDB_ID_STRATEGY") {
            self.id_strategy = match strategy.trim().to_ascii_lowercase().as_str() {
                "timestamp" => IdStrategy::Timestamp,
                "uuid" => IdStrategy::Uuid,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "RESTDB_ID_STRATEGY".to_string(),
                        value: strategy,
                    });
                }
            };
        }
        if let Some(origins) = lookup("RESTDB_CORS_ORIGINS") {
            self.cors.origins = origins;
        }
        Ok(self)
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
