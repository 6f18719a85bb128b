//! Configuration documents bundled with this crate.
//!
//! Bundled documents are addressed as `resource:<name>` URLs.

use logconf_types::{DEFAULT_RESOURCE, DEV_DEFAULT_RESOURCE};
use url::Url;

/// URL scheme of bundled resources.
pub const SCHEME: &str = "resource";

static BUNDLED: &[(&str, &str)] = &[
    (DEV_DEFAULT_RESOURCE, include_str!("../resources/logging-dev.yml")),
    (DEFAULT_RESOURCE, include_str!("../resources/logging-default.yml")),
];

/// Contents of a bundled document.
pub fn bundled(name: &str) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|(bundled_name, _)| *bundled_name == name)
        .map(|(_, content)| *content)
}

/// URL of a bundled document, if one with that name exists.
pub fn bundled_url(name: &str) -> Option<Url> {
    bundled(name)?;
    Url::parse(&format!("{}:{}", SCHEME, name)).ok()
}

/// Contents behind a `resource:` URL.
pub fn load(url: &Url) -> Option<&'static str> {
    if url.scheme() != SCHEME {
        return None;
    }
    bundled(url.path())
}
