//! File-based configuration source.
//!
//! `.toml` files are parsed with `toml`; everything else is read as YAML and
//! converted into the same tree. A null mapping value is an unset key.

use std::path::{Path, PathBuf};

use toml::{Table, Value};

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// A configuration source backed by a file that is known to exist.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigSource for FileSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        let table = load_config_file(&self.path)?;
        Ok(vec![ConfigEntry::root(table)])
    }
}

/// Loads and parses a config file, choosing the reader by extension.
pub fn load_config_file(path: &Path) -> Result<Table, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        return toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        });
    }

    let document: serde_yaml::Value =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::YamlError {
            path: path.to_path_buf(),
            source: e,
        })?;
    let yaml_error = |msg: &str| ConfigError::YamlError {
        path: path.to_path_buf(),
        source: <serde_yaml::Error as serde::de::Error>::custom(msg),
    };
    match yaml_to_toml(document).map_err(yaml_error)? {
        Some(Value::Table(table)) => Ok(table),
        // Empty or null document
        None => Ok(Table::new()),
        Some(_) => Err(yaml_error("top-level document must be a mapping")),
    }
}

/// Converts a YAML value into the TOML tree.
///
/// A null mapping value means the key is unset (`Ok(None)`). Values TOML
/// cannot hold without loss are rejected.
fn yaml_to_toml(value: serde_yaml::Value) -> Result<Option<Value>, &'static str> {
    use serde_yaml::Value as Yaml;

    let value = match value {
        Yaml::Null => return Ok(None),
        Yaml::Bool(b) => Value::Boolean(b),
        Yaml::Number(n) if n.is_f64() => Value::Float(n.as_f64().unwrap_or_default()),
        Yaml::Number(n) => Value::Integer(n.as_i64().ok_or("integer out of range")?),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => {
            let mut array = Vec::with_capacity(items.len());
            for item in items {
                array.push(yaml_to_toml(item)?.ok_or("null entry in sequence")?);
            }
            Value::Array(array)
        }
        Yaml::Mapping(mapping) => {
            let mut table = Table::new();
            for (key, value) in mapping {
                let Some(key) = yaml_key(key) else {
                    continue;
                };
                if let Some(value) = yaml_to_toml(value)? {
                    table.insert(key, value);
                }
            }
            Value::Table(table)
        }
        Yaml::Tagged(tagged) => return yaml_to_toml(tagged.value),
    };
    Ok(Some(value))
}

fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Some(s),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
