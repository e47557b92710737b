use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("base config not found in search paths")]
    BaseConfigNotFound,

    #[error("empty fields: [{}]", .fields.join(", "))]
    ValidationFailed { fields: Vec<String> },

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    YamlError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),

    #[error("failed to resolve current directory: {0}")]
    CurrentDir(std::io::Error),
}

impl ConfigError {
    /// Returns the offending field paths for a validation failure.
    pub fn empty_fields(&self) -> Option<&[String]> {
        match self {
            ConfigError::ValidationFailed { fields } => Some(fields),
            _ => None,
        }
    }
}
