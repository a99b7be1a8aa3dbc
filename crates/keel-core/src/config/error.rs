use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or interpreting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown or unsupported config format for path: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("cannot parse {format} configuration: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
