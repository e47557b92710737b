use std::path::{Path, PathBuf};

use super::base::BaseConfig;
use super::env::{EnvLookup, EnvSource, ProcessEnv};
use super::environment::Environment;
use super::file::FileSource;
use super::locate::Locator;
use super::merge::{merge_base, Layered};
use super::schema::validate;
use super::source::{collect, ConfigSource};
use super::ConfigError;

/// Default name of the shared base file read in the local environment.
pub const DEFAULT_BASE_FILE: &str = ".env.local.base.yaml";

/// Default pattern of the environment-specific file.
pub const DEFAULT_ENV_FILE_PATTERN: &str = ".env.{env}.yaml";

/// Default number of ancestor directories searched for the base file.
pub const DEFAULT_BASE_DEPTH: usize = 4;

/// Default number of ancestor directories searched for the environment file.
pub const DEFAULT_ENV_DEPTH: usize = 2;

/// Loads a caller configuration layered on top of [`BaseConfig`].
///
/// Loading runs in a fixed order:
///
/// 1. An empty environment tag resolves to `local`.
/// 2. In `local`, the base file is looked up along the search path and read;
///    every other environment (or a missing file) binds the base purely from
///    environment variables. If no base variable is set either, loading fails
///    with [`ConfigError::BaseConfigNotFound`].
/// 3. The environment file (`.env.<env>.yaml`) is read into `T`, or `T` is
///    bound from environment variables if no file is found.
/// 4. Base sections are copied into `T` through [`Layered`].
/// 5. The base and then `T` are validated; the first one with empty required
///    fields fails with [`ConfigError::ValidationFailed`].
///
/// Environment variables always override values read from a file.
///
/// ## Example
///
/// ```no_run
/// use config_strata::{BaseConfig, Loader};
///
/// let config: BaseConfig = Loader::builder()
///     .with_root("/srv/app")
///     .with_env_prefix("MYAPP_")
///     .load("prod")?;
/// # Ok::<(), config_strata::ConfigError>(())
/// ```
#[derive(Debug)]
#[must_use = "builders do nothing until .load() is called"]
pub struct Loader {
    base_file: String,
    env_file_pattern: String,
    root: Option<PathBuf>,
    base_depth: usize,
    env_depth: usize,
    search_paths: Option<Vec<PathBuf>>,
    env_prefix: String,
    lookup: Box<dyn EnvLookup>,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            base_file: DEFAULT_BASE_FILE.to_string(),
            env_file_pattern: DEFAULT_ENV_FILE_PATTERN.to_string(),
            root: None,
            base_depth: DEFAULT_BASE_DEPTH,
            env_depth: DEFAULT_ENV_DEPTH,
            search_paths: None,
            env_prefix: String::new(),
            lookup: Box::new(ProcessEnv),
        }
    }
}

impl Loader {
    /// Creates a loader with the default file names and search depths.
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn with_base_file(mut self, name: impl Into<String>) -> Self {
        self.base_file = name.into();
        self
    }

    /// Sets the environment file pattern; `{env}` is replaced by the tag.
    pub fn with_env_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.env_file_pattern = pattern.into();
        self
    }

    /// Sets the directory the ancestor search starts from.
    ///
    /// Defaults to the current working directory. A relative root is resolved
    /// against the working directory.
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = Some(root.as_ref().to_path_buf());
        self
    }

    pub fn with_base_depth(mut self, depth: usize) -> Self {
        self.base_depth = depth;
        self
    }

    pub fn with_env_depth(mut self, depth: usize) -> Self {
        self.env_depth = depth;
        self
    }

    /// Replaces the ancestor walk with an explicit list of directories,
    /// searched in order for both files.
    pub fn with_search_paths<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Prepends `prefix` to every environment-variable name.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Replaces the process environment as the source of variables.
    pub fn with_env_lookup(mut self, lookup: impl EnvLookup + 'static) -> Self {
        self.lookup = Box::new(lookup);
        self
    }

    /// Loads, merges, and validates a configuration for `environment`.
    pub fn load<T: Layered>(&self, environment: impl Into<Environment>) -> Result<T, ConfigError> {
        let environment = environment.into();
        let base = self.load_base(&environment)?;

        let env_file = environment.file_name(&self.env_file_pattern);
        let path = self.locator(self.env_depth)?.find(&env_file);
        let (mut config, _) = self.read_layer::<T>(path.as_deref())?;

        merge_base(&base, &mut config);

        validate(&base)?;
        validate(&config)?;
        Ok(config)
    }

    fn load_base(&self, environment: &Environment) -> Result<BaseConfig, ConfigError> {
        let path = if environment.is_local() {
            self.locator(self.base_depth)?.find(&self.base_file)
        } else {
            None
        };

        if path.is_none() {
            tracing::debug!(%environment, "binding base config from environment variables");
        }

        let (base, bound) = self.read_layer::<BaseConfig>(path.as_deref())?;
        if path.is_none() && bound == 0 {
            return Err(ConfigError::BaseConfigNotFound);
        }
        Ok(base)
    }

    /// Reads an optional file, overlays environment variables, and deserializes.
    ///
    /// Also returns how many entries the sources produced.
    fn read_layer<T: Layered>(&self, path: Option<&Path>) -> Result<(T, usize), ConfigError> {
        let shape = T::default();
        let env = EnvSource::new(&shape, &self.env_prefix, self.lookup.as_ref());

        let (merged, count) = match path {
            Some(path) => {
                let file = FileSource::new(path);
                collect(&[&file as &dyn ConfigSource, &env])?
            }
            None => collect(&[&env])?,
        };

        let value = toml::Value::Table(merged);
        let config = value.try_into().map_err(ConfigError::DeserializeError)?;
        Ok((config, count))
    }

    fn locator(&self, depth: usize) -> Result<Locator, ConfigError> {
        if let Some(dirs) = &self.search_paths {
            return Ok(Locator::new(dirs.iter().cloned()));
        }
        let root = match &self.root {
            Some(root) if root.is_absolute() => root.clone(),
            // Relative roots resolve against the working directory.
            Some(root) => current_dir()?.join(root),
            None => current_dir()?,
        };
        Ok(Locator::ancestors(root, depth))
    }
}

fn current_dir() -> Result<PathBuf, ConfigError> {
    std::env::current_dir().map_err(ConfigError::CurrentDir)
}

/// Loads a configuration with the default [`Loader`] settings.
///
/// Files are searched from the current working directory and variables are
/// read from the process environment.
pub fn load_config<T: Layered>(environment: impl Into<Environment>) -> Result<T, ConfigError> {
    Loader::builder().load(environment)
}
