//! Context property assembly.

use logconf_types::{Environment, PropertyBag, PropertyKey, HOME_PROPERTY};
use tracing::debug;
use crate::config::Config;

/// Build the property bag seeded into the backend context.
///
/// The bag always holds `application.home`. Host configuration entries are
/// added when `logger.include_config_properties` is set, and `explicit`
/// properties override anything derived.
pub fn build(env: &dyn Environment, host_config: &Config, explicit: &PropertyBag) -> PropertyBag {
    let mut bag = home_only(env.root_path());

    if host_config.include_config_properties() {
        let derived: PropertyBag = host_config
            .entries()
            .into_iter()
            .filter_map(|(key, value)| match PropertyKey::new(&key) {
                Ok(key) => Some((key, value)),
                Err(_) => {
                    debug!(%key, "skipping host configuration entry with an unusable key");
                    None
                }
            })
            .collect();
        bag.merge(&derived);
    }

    bag.merge(explicit);
    bag
}

/// A bag holding only `application.home`.
pub fn home_only(root_path: &std::path::Path) -> PropertyBag {
    let mut bag = PropertyBag::new();
    let home = PropertyKey::new(HOME_PROPERTY).map(|key| (key, root_path.display().to_string()));
    bag.extend(home);
    bag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::AppEnvironment;
    use logconf_types::Mode;
    use tempfile::TempDir;

    fn env(dir: &TempDir) -> AppEnvironment {
        AppEnvironment::new(dir.path(), Mode::Prod).unwrap()
    }

    #[test]
    fn test_always_contains_home() {
        let dir = TempDir::new().unwrap();
        let bag = build(&env(&dir), &Config::empty(), &PropertyBag::new());
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get(HOME_PROPERTY), Some(dir.path().display().to_string().as_str()));
    }

    #[test]
    fn test_config_entries_only_when_enabled() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::empty();
        config.set("server.id", "api-1").unwrap();

        let bag = build(&env(&dir), &config, &PropertyBag::new());
        assert!(!bag.contains_key("server.id"));

        config.set("logger.include_config_properties", true).unwrap();
        let bag = build(&env(&dir), &config, &PropertyBag::new());
        assert_eq!(bag.get("server.id"), Some("api-1"));
        assert_eq!(bag.get("logger.include_config_properties"), Some("true"));
    }

    #[test]
    fn test_explicit_wins_over_derived() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::empty();
        config.set("logger.include_config_properties", true).unwrap();
        config.set("process.name", "from-config").unwrap();

        let mut explicit = PropertyBag::new();
        explicit.insert("process.name", "explicit").unwrap();
        explicit.insert(HOME_PROPERTY, "/override/home").unwrap();

        let bag = build(&env(&dir), &config, &explicit);
        assert_eq!(bag.get("process.name"), Some("explicit"));
        assert_eq!(bag.get(HOME_PROPERTY), Some("/override/home"));
    }

    #[test]
    fn test_unusable_keys_are_skipped() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::empty();
        config.set("logger.include_config_properties", true).unwrap();
        config.set("bad key", "x").unwrap();
        let bag = build(&env(&dir), &config, &PropertyBag::new());
        assert!(!bag.contains_key("bad key"));
        assert_eq!(bag.len(), 2);
    }
}
