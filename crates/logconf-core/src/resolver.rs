//! Configuration source resolution.
//!
//! Sources are tried in this order, first match wins:
//! 1. `logger.resource`: a resource on the environment's resource path,
//!    falling back to `<root>/conf/<name>`
//! 2. `logger.file`: a file path
//! 3. `logger.url`: a URL, which must parse
//! 4. the documented `logging.yml` resource
//! 5. the bundled default for the environment's mode
//!
//! When nothing matches, there is no source.

use logconf_types::{Environment, LogConfError, Mode, PropertyLookup, Result, PRIMARY_RESOURCE};
use tracing::debug;
use url::Url;
use crate::config::{FILE_OVERRIDE, RESOURCE_OVERRIDE, URL_OVERRIDE};
use crate::resources;
use crate::util::fs::file_url;

/// Operator overrides for the configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOverrides {
    /// Resource name (`logger.resource`)
    pub resource: Option<String>,
    /// File path (`logger.file`)
    pub file: Option<String>,
    /// URL text (`logger.url`)
    pub url: Option<String>,
}

impl SourceOverrides {
    /// No overrides.
    pub fn none() -> Self {
        Self::default()
    }

    /// Read the three override keys from `settings`.
    pub fn from_lookup(settings: &dyn PropertyLookup) -> Self {
        Self {
            resource: settings.lookup(RESOURCE_OVERRIDE),
            file: settings.lookup(FILE_OVERRIDE),
            url: settings.lookup(URL_OVERRIDE),
        }
    }

    /// Whether any override is present.
    pub fn is_empty(&self) -> bool {
        self.resource.is_none() && self.file.is_none() && self.url.is_none()
    }
}

/// Determine the configuration source for `env`.
///
/// # Errors
///
/// Returns [`LogConfError::MalformedUrl`] when the `logger.url` override is
/// the winning candidate and does not parse.
pub fn resolve(env: &dyn Environment, overrides: &SourceOverrides) -> Result<Option<Url>> {
    if let Some(name) = &overrides.resource {
        let url = match env.resource(name) {
            Some(url) => url,
            None => file_url(env.get_file("conf").join(name))?,
        };
        debug!(%url, resource = %name, "configuration source from resource override");
        return Ok(Some(url));
    }

    if let Some(path) = &overrides.file {
        let url = file_url(path)?;
        debug!(%url, "configuration source from file override");
        return Ok(Some(url));
    }

    if let Some(text) = &overrides.url {
        let url = Url::parse(text).map_err(|e| LogConfError::malformed_url(text, e))?;
        debug!(%url, "configuration source from url override");
        return Ok(Some(url));
    }

    if let Some(url) = env.resource(PRIMARY_RESOURCE) {
        debug!(%url, "configuration source from documented resource");
        return Ok(Some(url));
    }

    let fallback = env.resource(env.mode().default_resource());
    match &fallback {
        Some(url) => debug!(%url, mode = %env.mode(), "configuration source from mode default"),
        None => debug!(mode = %env.mode(), "no configuration source found"),
    }
    Ok(fallback)
}

/// The bundled default for `mode`, without consulting any environment.
pub fn bundled_default(mode: Mode) -> Option<Url> {
    resources::bundled_url(mode.default_resource())
}
