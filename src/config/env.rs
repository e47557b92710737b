//! Environment-variable binding driven by a [`Schema`] description.

use std::collections::HashMap;
use std::fmt;

use toml::Value;

use super::schema::{FieldSpec, Leaf, LeafKind, Schema, Visitor};
use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// Looks up environment variables by name.
pub trait EnvLookup: fmt::Debug + Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Binds the leaves of a schema to environment variables.
///
/// The variable name of a leaf is `prefix` followed by the prefix of every
/// enclosing section and the leaf's own segment, e.g. `PUBLIC_` + `TLS_` + `CERT`.
pub struct EnvSource<'a> {
    schema: &'a dyn Schema,
    prefix: &'a str,
    lookup: &'a dyn EnvLookup,
}

impl<'a> EnvSource<'a> {
    pub fn new(schema: &'a dyn Schema, prefix: &'a str, lookup: &'a dyn EnvLookup) -> Self {
        Self {
            schema,
            prefix,
            lookup,
        }
    }
}

impl ConfigSource for EnvSource<'_> {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        let mut binder = Binder {
            lookup: self.lookup,
            names: vec![self.prefix.to_string()],
            path: Vec::new(),
            entries: Vec::new(),
        };
        self.schema.visit(&mut binder);
        Ok(binder.entries)
    }
}

struct Binder<'a> {
    lookup: &'a dyn EnvLookup,
    names: Vec<String>,
    path: Vec<String>,
    entries: Vec<ConfigEntry>,
}

impl Visitor for Binder<'_> {
    fn leaf(&mut self, spec: &FieldSpec, value: &dyn Leaf) {
        let name = format!("{}{}", self.names.concat(), spec.env);
        let Some(raw) = self.lookup.get(&name) else {
            return;
        };
        tracing::trace!(var = %name, key = spec.key, "bound environment variable");

        let mut path = self.path.clone();
        path.push(spec.key.to_string());
        self.entries
            .push(ConfigEntry::at_path(path, coerce_value(&raw, value.kind())));
    }

    fn section(&mut self, spec: &FieldSpec, section: &dyn Schema) {
        self.names.push(spec.env.to_string());
        self.path.push(spec.key.to_string());
        section.visit(self);
        self.path.pop();
        self.names.pop();
    }
}

/// Converts a raw variable into the value shape the leaf expects.
///
/// Values that don't parse as the expected kind are kept as strings so that
/// deserialization reports the mismatch.
fn coerce_value(s: &str, kind: LeafKind) -> Value {
    match kind {
        LeafKind::Str => Value::String(s.to_string()),
        LeafKind::Bool if s.eq_ignore_ascii_case("true") => Value::Boolean(true),
        LeafKind::Bool if s.eq_ignore_ascii_case("false") => Value::Boolean(false),
        LeafKind::Int if looks_like_integer(s) => match s.parse::<i64>() {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::String(s.to_string()),
        },
        LeafKind::Float => match s.parse::<f64>() {
            Ok(f) => Value::Float(f),
            Err(_) => Value::String(s.to_string()),
        },
        _ => Value::String(s.to_string()),
    }
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
