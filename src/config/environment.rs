//! Environment tags selecting which overlay file is loaded.

use std::fmt;

/// Placeholder replaced by the environment tag in file name patterns.
pub const ENV_PLACEHOLDER: &str = "{env}";

/// The deployment environment a configuration is loaded for.
///
/// An empty tag resolves to [`Environment::Local`]. Only the local environment
/// reads the shared base file; every other environment takes its base values
/// from the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    #[default]
    Local,
    Test,
    Prod,
    Custom(String),
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Local => "local",
            Environment::Test => "test",
            Environment::Prod => "prod",
            Environment::Custom(tag) => tag,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Environment::Local)
    }

    /// Expands a file name pattern such as `.env.{env}.yaml` for this environment.
    pub fn file_name(&self, pattern: &str) -> String {
        pattern.replace(ENV_PLACEHOLDER, self.as_str())
    }
}

impl From<&str> for Environment {
    fn from(tag: &str) -> Self {
        match tag {
            "" | "local" => Environment::Local,
            "test" => Environment::Test,
            "prod" => Environment::Prod,
            other => Environment::Custom(other.to_string()),
        }
    }
}

impl From<String> for Environment {
    fn from(tag: String) -> Self {
        Environment::from(tag.as_str())
    }
}

impl From<&Environment> for Environment {
    fn from(env: &Environment) -> Self {
        env.clone()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
