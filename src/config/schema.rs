//! Schema descriptions for configuration types.
//!
//! A configuration type describes its fields by implementing [`Schema`]: each
//! leaf and nested section is reported to a [`Visitor`] together with its
//! [`FieldSpec`]. The same description drives environment-variable binding and
//! validation of required fields.

use std::path::PathBuf;

use super::ConfigError;

/// Metadata for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Serialization key in configuration documents.
    pub key: &'static str,
    /// Environment-variable segment. For sections this is the prefix applied
    /// to every nested field (e.g. `PUBLIC_`).
    pub env: &'static str,
    /// Whether validation rejects an empty value.
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(key: &'static str, env: &'static str) -> Self {
        Self {
            key,
            env,
            required: true,
        }
    }

    pub const fn optional(key: &'static str, env: &'static str) -> Self {
        Self {
            key,
            env,
            required: false,
        }
    }
}

/// The scalar shape of a leaf, used to coerce raw environment values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Str,
    Bool,
    Int,
    Float,
}

/// A scalar configuration value.
pub trait Leaf {
    /// Returns `true` if the value is the type's zero value.
    fn is_empty(&self) -> bool;

    fn kind(&self) -> LeafKind;
}

impl Leaf for String {
    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }

    fn kind(&self) -> LeafKind {
        LeafKind::Str
    }
}

impl Leaf for PathBuf {
    fn is_empty(&self) -> bool {
        self.as_os_str().is_empty()
    }

    fn kind(&self) -> LeafKind {
        LeafKind::Str
    }
}

impl Leaf for bool {
    fn is_empty(&self) -> bool {
        !*self
    }

    fn kind(&self) -> LeafKind {
        LeafKind::Bool
    }
}

impl Leaf for f64 {
    fn is_empty(&self) -> bool {
        *self == 0.0
    }

    fn kind(&self) -> LeafKind {
        LeafKind::Float
    }
}

macro_rules! int_leaf {
    ($($ty:ty),*) => {
        $(
            impl Leaf for $ty {
                fn is_empty(&self) -> bool {
                    *self == 0
                }

                fn kind(&self) -> LeafKind {
                    LeafKind::Int
                }
            }
        )*
    };
}

int_leaf!(i32, i64, u16, u32, u64, usize);

impl<T: Leaf + Default> Leaf for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }

    fn kind(&self) -> LeafKind {
        match self {
            Some(value) => value.kind(),
            None => T::default().kind(),
        }
    }
}

/// Receives the fields of a [`Schema`] in declaration order.
pub trait Visitor {
    fn leaf(&mut self, spec: &FieldSpec, value: &dyn Leaf);

    fn section(&mut self, spec: &FieldSpec, section: &dyn Schema);
}

/// A configuration type that can describe its own fields.
///
/// ```
/// use config_strata::{FieldSpec, Schema, Visitor};
///
/// #[derive(Default)]
/// struct Queue {
///     uri: String,
///     prefetch: u32,
/// }
///
/// impl Schema for Queue {
///     fn visit(&self, v: &mut dyn Visitor) {
///         v.leaf(&FieldSpec::required("uri", "URI"), &self.uri);
///         v.leaf(&FieldSpec::optional("prefetch", "PREFETCH"), &self.prefetch);
///     }
/// }
///
/// assert_eq!(config_strata::empty_fields(&Queue::default()), vec!["uri"]);
/// ```
pub trait Schema {
    fn visit(&self, visitor: &mut dyn Visitor);
}

/// Returns the dotted key path of every required field left empty.
///
/// A section marked optional exempts its whole subtree.
pub fn empty_fields(schema: &dyn Schema) -> Vec<String> {
    let mut walker = EmptyFields::default();
    schema.visit(&mut walker);
    walker.found
}

/// Fails with [`ConfigError::ValidationFailed`] if any required field is empty.
pub fn validate(schema: &dyn Schema) -> Result<(), ConfigError> {
    let fields = empty_fields(schema);
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed { fields })
    }
}

#[derive(Default)]
struct EmptyFields {
    path: Vec<&'static str>,
    found: Vec<String>,
}

impl EmptyFields {
    fn path_to(&self, key: &str) -> String {
        let mut path = self.path.join(".");
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(key);
        path
    }
}

impl Visitor for EmptyFields {
    fn leaf(&mut self, spec: &FieldSpec, value: &dyn Leaf) {
        if spec.required && value.is_empty() {
            self.found.push(self.path_to(spec.key));
        }
    }

    fn section(&mut self, spec: &FieldSpec, section: &dyn Schema) {
        if !spec.required {
            return;
        }
        self.path.push(spec.key);
        section.visit(self);
        self.path.pop();
    }
}
