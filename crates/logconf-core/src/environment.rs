//! Application environment descriptor.

use logconf_types::{Environment, LogConfError, Mode, Result};
use std::path::{Path, PathBuf};
use url::Url;
use crate::resources;
use crate::util::fs::{absolute, file_url};

/// Environment of a host application: its root, mode and resource path.
///
/// Resources are looked up in the configured resource directories first
/// (by default `<root>/conf`), then among the documents bundled with this
/// crate.
#[derive(Debug, Clone)]
pub struct AppEnvironment {
    root_path: PathBuf,
    mode: Mode,
    resource_dirs: Vec<PathBuf>,
}

impl AppEnvironment {
    /// Create an environment rooted at `root_path`.
    pub fn new(root_path: impl AsRef<Path>, mode: Mode) -> Result<Self> {
        let root_path = absolute(root_path)?;
        if root_path.exists() && !root_path.is_dir() {
            return Err(LogConfError::Environment(format!(
                "Application root is not a directory: {:?}",
                root_path
            )));
        }
        let resource_dirs = vec![root_path.join("conf")];
        Ok(Self {
            root_path,
            mode,
            resource_dirs,
        })
    }

    /// Replace the resource directories.
    pub fn with_resource_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.resource_dirs = dirs
            .into_iter()
            .map(|d| self.root_path.join(d.as_ref()))
            .collect();
        self
    }

    /// Directories searched for resources, in order.
    pub fn resource_dirs(&self) -> &[PathBuf] {
        &self.resource_dirs
    }
}

impl Environment for AppEnvironment {
    fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn resource(&self, name: &str) -> Option<Url> {
        let name = name.trim_start_matches('/');
        self.resource_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
            .and_then(|found| file_url(found).ok())
            .or_else(|| resources::bundled_url(name))
    }
}
