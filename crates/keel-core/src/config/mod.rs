//! # Configuration
//!
//! Hierarchical key/value configuration with dot-notation lookup, loaded from
//! JSON, TOML, or YAML by file extension (the latter two behind the
//! `toml-config` / `yaml-config` features, both default).
//!
//! [`AppSettings`] extracts the `app.*` keys the kernel itself recognizes.

pub mod error;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use error::ConfigError;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires the "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires the "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Determine format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// In-memory configuration tree with dot-notation access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigData {
    root: serde_json::Value,
}

impl ConfigData {
    /// Empty configuration.
    pub fn new() -> Self {
        Self {
            root: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Load a configuration file, inferring the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format =
            ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            })?;
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data, format)
    }

    /// Parse configuration text in the given format.
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let root = match format {
            ConfigFormat::Json => {
                serde_json::from_str(data).map_err(|e| ConfigError::Parse {
                    format: "JSON",
                    message: e.to_string(),
                })?
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::from_str::<serde_json::Value>(data).map_err(|e| {
                    ConfigError::Parse {
                        format: "YAML",
                        message: e.to_string(),
                    }
                })?
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => {
                let value: toml::Value =
                    toml::from_str(data).map_err(|e| ConfigError::Parse {
                        format: "TOML",
                        message: e.to_string(),
                    })?;
                serde_json::to_value(value).map_err(|e| ConfigError::Parse {
                    format: "TOML",
                    message: e.to_string(),
                })?
            }
        };
        Ok(Self { root })
    }

    /// Look up a value by dot-notation key ("app.name").
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        let mut current = &self.root;
        for part in key.split('.') {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Typed lookup; `None` when the key is absent or the value does not
    /// deserialize.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// String lookup.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    /// Typed lookup with default.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_as(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Deployment environment, from `app.env`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Testing,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "testing" => Ok(Environment::Testing),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "'{}' is not one of development, testing, staging, production",
                other
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        write!(f, "{}", s)
    }
}

/// The `app.*` configuration keys the kernel recognizes.
#[derive(Debug, Clone, Default)]
pub struct AppSettings {
    pub name: Option<String>,
    pub version: Option<String>,
    pub env: Environment,
    pub shutdown_timeout: Option<Duration>,
    pub extra: HashMap<String, serde_json::Value>,
}

impl AppSettings {
    /// Extract and validate the kernel-relevant keys.
    pub fn from_config(config: &ConfigData) -> Result<Self, ConfigError> {
        let env = match config.get_str("app.env") {
            Some(raw) => raw
                .parse::<Environment>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: "app.env".to_string(),
                    message,
                })?,
            None => Environment::default(),
        };

        let shutdown_timeout = match config.get_str("app.shutdown_timeout") {
            Some(raw) => Some(humantime::parse_duration(raw).map_err(|e| {
                ConfigError::InvalidValue {
                    key: "app.shutdown_timeout".to_string(),
                    message: e.to_string(),
                }
            })?),
            None => None,
        };

        let extra = config
            .get("app")
            .and_then(|v| v.as_object())
            .map(|obj| {
                obj.iter()
                    .filter(|(k, _)| {
                        !matches!(k.as_str(), "name" | "version" | "env" | "shutdown_timeout")
                    })
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            name: config.get_as("app.name"),
            version: config.get_as("app.version"),
            env,
            shutdown_timeout,
            extra,
        })
    }
}
