//! Filesystem utilities.

use logconf_types::{LogConfError, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Expand a leading tilde to the home directory.
pub fn expand_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }

    path.to_path_buf()
}

/// Make a path absolute against the current working directory.
pub fn absolute(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = expand_path(path);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Build a `file:` URL for a path, which need not exist.
pub fn file_url(path: impl AsRef<Path>) -> Result<Url> {
    let path = absolute(path)?;
    Url::from_file_path(&path).map_err(|_| LogConfError::InvalidPath(path))
}
