//! Host configuration and process-level settings.
//!
//! This module provides the read-only settings logconf consults while
//! resolving and applying logging configuration:
//! - A layered host configuration (`Config`) loaded from YAML
//! - Process-level override settings (`ProcessSettings`) read from the
//!   environment
//!
//! ## Configuration Layers
//!
//! Configuration values are resolved in this priority order:
//! 1. Programmatically set values
//! 2. Values loaded from file
//!
//! ## Example
//!
//! ```rust
//! use logconf_core::config::Config;
//! use logconf_types::PropertyLookup;
//!
//! let mut config = Config::empty();
//! config.set("logger.include_config_properties", true).unwrap();
//! config.set("server.id", "api-1").unwrap();
//!
//! assert!(config.include_config_properties());
//! assert_eq!(config.lookup("server.id").as_deref(), Some("api-1"));
//! ```

use logconf_types::{LogConfError, PropertyLookup, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use crate::util::data::{deep_merge, flatten, get_path, load_yaml_file, to_property_string};

/// Override key naming a resource on the environment's resource path.
pub const RESOURCE_OVERRIDE: &str = "logger.resource";

/// Override key naming a configuration file.
pub const FILE_OVERRIDE: &str = "logger.file";

/// Override key holding a configuration URL.
pub const URL_OVERRIDE: &str = "logger.url";

/// Host configuration flag: inject every host configuration entry as a
/// context property.
pub const INCLUDE_CONFIG_PROPERTIES: &str = "logger.include_config_properties";

/// Configuration layer priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLayer {
    /// Values loaded from file
    Loaded = 0,
    /// Values set programmatically
    Set = 1,
}

impl ConfigLayer {
    const HIGHEST_FIRST: [ConfigLayer; 2] = [ConfigLayer::Set, ConfigLayer::Loaded];
}

/// Layered host configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    layers: HashMap<ConfigLayer, Value>,
}

impl Config {
    /// An empty configuration.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file.
    ///
    /// If the file doesn't exist, an empty configuration is created.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut layers = HashMap::new();

        if path.exists() {
            let value = load_yaml_file(path)
                .map_err(|e| LogConfError::Config(format!("Failed to load config file: {}", e)))?;

            // An empty YAML document parses to null
            if !value.is_null() {
                layers.insert(ConfigLayer::Loaded, value);
            }
        } else {
            debug!(path = %path.display(), "host configuration file not found, using empty configuration");
        }

        Ok(Self { layers })
    }

    /// Get a configuration value by key, respecting layer priority.
    ///
    /// Returns None if the key doesn't exist in any layer.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        for layer in &ConfigLayer::HIGHEST_FIRST {
            if let Some(value) = self.layers.get(layer).and_then(|data| get_path(data, key)) {
                if let Ok(typed_value) = serde_json::from_value(value.clone()) {
                    return Some(typed_value);
                }
            }
        }

        None
    }

    /// Set a configuration value programmatically.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| LogConfError::Config(format!("Failed to serialize value: {}", e)))?;

        let set_layer = self
            .layers
            .entry(ConfigLayer::Set)
            .or_insert_with(|| Value::Object(Default::default()));

        Self::set_value_at_path(set_layer, key, value)
    }

    /// Whether host configuration entries should become context properties.
    pub fn include_config_properties(&self) -> bool {
        match self.get::<Value>(INCLUDE_CONFIG_PROPERTIES) {
            Some(Value::Bool(flag)) => flag,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Every scalar entry of the merged configuration as dotted key/value
    /// strings. Null entries are skipped.
    pub fn entries(&self) -> Vec<(String, String)> {
        flatten(&self.merged_data())
            .into_iter()
            .filter_map(|(key, value)| to_property_string(&value).map(|v| (key, v)))
            .collect()
    }

    /// Get merged data from all layers.
    pub fn merged_data(&self) -> Value {
        let mut merged = Value::Object(serde_json::Map::new());

        for layer in ConfigLayer::HIGHEST_FIRST.iter().rev() {
            if let Some(layer_data) = self.layers.get(layer) {
                merged = deep_merge(merged, layer_data.clone());
            }
        }

        merged
    }

    // Helper: Set value at dotted path
    fn set_value_at_path(data: &mut Value, path: &str, value: Value) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(LogConfError::Config(format!("Invalid configuration key: '{}'", path)));
        }

        let (last, parents) = parts
            .split_last()
            .ok_or_else(|| LogConfError::Config("Empty path".to_string()))?;

        // Navigate to parent, creating intermediate objects as needed
        let mut current = data;
        for part in parents {
            if !current.is_object() {
                *current = Value::Object(Default::default());
            }
            let Value::Object(map) = current else {
                logconf_types::bug!("configuration node is not an object after coercion");
            };
            current = map
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Default::default()));
        }

        if !current.is_object() {
            *current = Value::Object(Default::default());
        }
        if let Value::Object(map) = current {
            map.insert(last.to_string(), value);
        }

        Ok(())
    }
}

impl PropertyLookup for Config {
    fn lookup(&self, key: &str) -> Option<String> {
        for layer in &ConfigLayer::HIGHEST_FIRST {
            if let Some(value) = self.layers.get(layer).and_then(|data| get_path(data, key)) {
                return to_property_string(value);
            }
        }
        None
    }
}

/// Process-level settings read from environment variables.
///
/// A dotted key maps to an upper-case variable name with dots replaced by
/// underscores, so `logger.file` is read from `LOGGER_FILE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessSettings;

impl ProcessSettings {
    /// Environment variable name for a dotted key.
    pub fn variable_name(key: &str) -> String {
        key.replace(['.', '-'], "_").to_uppercase()
    }
}

impl PropertyLookup for ProcessSettings {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(Self::variable_name(key)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_set_overrides_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "key: loaded_value\nother: kept").unwrap();
        let mut config = Config::load(file.path()).unwrap();
        assert_eq!(config.get::<String>("key").unwrap(), "loaded_value");

        config.set("key", "set_value").unwrap();
        assert_eq!(config.get::<String>("key").unwrap(), "set_value");
        assert_eq!(config.lookup("other").as_deref(), Some("kept"));
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "logger:\n  include_config_properties: true\nserver:\n  id: 42").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.include_config_properties());
        assert_eq!(config.lookup("server.id").as_deref(), Some("42"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.yml")).unwrap();
        assert!(config.entries().is_empty());
        assert!(!config.include_config_properties());
    }

    #[test]
    fn test_entries_skip_nulls() {
        let mut config = Config::empty();
        config.set("a.b", "x").unwrap();
        config.set("a.c", Value::Null).unwrap();
        config.set("n", 5).unwrap();
        let mut entries = config.entries();
        entries.sort();
        assert_eq!(
            entries,
            vec![("a.b".to_string(), "x".to_string()), ("n".to_string(), "5".to_string())]
        );
    }

    #[test]
    fn test_invalid_key_rejected() {
        let mut config = Config::empty();
        assert!(config.set("a..b", 1).is_err());
    }

    #[test]
    fn test_process_variable_name() {
        assert_eq!(ProcessSettings::variable_name("logger.resource"), "LOGGER_RESOURCE");
        assert_eq!(ProcessSettings::variable_name("logger.url"), "LOGGER_URL");
    }
}
