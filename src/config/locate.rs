//! Locating configuration files along a bounded search path.

use std::path::{Path, PathBuf};

/// An ordered list of directories probed for configuration files.
///
/// Directories are checked in order and the first one containing the file wins.
/// The locator only checks for existence; it never creates or modifies anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locator {
    dirs: Vec<PathBuf>,
}

impl Locator {
    /// Creates a locator over an explicit list of directories.
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a locator over `start` and at most `depth` of its ancestors.
    ///
    /// The walk stops early at the filesystem root.
    pub fn ancestors(start: impl AsRef<Path>, depth: usize) -> Self {
        Self::new(start.as_ref().ancestors().take(depth + 1))
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Returns the path of the first `file_name` found in the search list.
    pub fn find(&self, file_name: &str) -> Option<PathBuf> {
        let found = self
            .dirs
            .iter()
            .map(|dir| dir.join(file_name))
            .find(|candidate| candidate.is_file());

        match &found {
            Some(path) => tracing::debug!(file = file_name, path = %path.display(), "located config file"),
            None => tracing::debug!(file = file_name, searched = self.dirs.len(), "config file not found"),
        }
        found
    }
}
