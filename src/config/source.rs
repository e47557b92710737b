use toml::{Table, Value};

use super::ConfigError;

/// A value contributed by a source, addressed by its key path.
#[derive(Debug, Clone)]
pub struct ConfigEntry {
    pub path: Vec<String>,
    pub value: Value,
}

impl ConfigEntry {
    pub fn root(table: Table) -> Self {
        Self {
            path: Vec::new(),
            value: Value::Table(table),
        }
    }

    pub fn at_path(path: Vec<String>, value: Value) -> Self {
        Self { path, value }
    }
}

/// A layer in the loading pipeline.
pub trait ConfigSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError>;
}

/// Applies `sources` in order, later entries overriding earlier ones.
///
/// Returns the merged tree and the number of entries that contributed to it.
pub fn collect(sources: &[&dyn ConfigSource]) -> Result<(Table, usize), ConfigError> {
    let mut merged = Table::new();
    let mut count = 0;
    for source in sources {
        for entry in source.entries()? {
            merge_at_path(&mut merged, &entry.path, entry.value);
            count += 1;
        }
    }
    Ok((merged, count))
}

/// Merges `value` into `table` at `path`.
///
/// The value is wrapped in one table per path segment and then deep-merged,
/// so existing siblings survive and a scalar on the way is replaced by a table.
pub fn merge_at_path(table: &mut Table, path: &[String], value: Value) {
    let wrapped = path.iter().rev().fold(value, |inner, key| {
        Value::Table(Table::from_iter([(key.clone(), inner)]))
    });
    if let Value::Table(overlay) = wrapped {
        deep_merge(table, overlay);
    }
}

/// Recursively merges `overlay` into `base`. Tables merge key by key;
/// any other value replaces what was there.
fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, incoming) in overlay {
        let replacement = match (base.get_mut(&key), incoming) {
            (Some(Value::Table(existing)), Value::Table(nested)) => {
                deep_merge(existing, nested);
                None
            }
            (_, other) => Some(other),
        };
        if let Some(value) = replacement {
            base.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_nested_insert_creates_tables() {
        let mut table = Table::new();
        merge_at_path(&mut table, &path(&["public", "tls", "cert"]), Value::from("c.pem"));
        assert_eq!(table["public"]["tls"]["cert"].as_str(), Some("c.pem"));
    }

    #[test]
    fn test_overlay_keeps_sibling_keys() {
        let mut table: Table = toml::from_str(
            r#"
            [public]
            hostname = "file.example"
            [public.tls]
            cert = "file.pem"
            "#,
        )
        .unwrap();
        merge_at_path(&mut table, &path(&["public", "tls", "cert"]), Value::from("env.pem"));

        assert_eq!(table["public"]["hostname"].as_str(), Some("file.example"));
        assert_eq!(table["public"]["tls"]["cert"].as_str(), Some("env.pem"));
    }

    #[test]
    fn test_empty_path_merges_root_table() {
        let mut table: Table = toml::from_str("[api]\ntoken = \"a\"\nbaseUrl = \"u\"").unwrap();
        let overlay: Table = toml::from_str("[api]\ntoken = \"b\"").unwrap();
        merge_at_path(&mut table, &[], Value::Table(overlay));

        assert_eq!(table["api"]["token"].as_str(), Some("b"));
        assert_eq!(table["api"]["baseUrl"].as_str(), Some("u"));
    }

    #[test]
    fn test_scalar_replaced_by_table() {
        let mut table: Table = toml::from_str(r#"api = "flat""#).unwrap();
        merge_at_path(&mut table, &path(&["api", "token"]), Value::from("t"));
        assert_eq!(table["api"]["token"].as_str(), Some("t"));
    }
}
