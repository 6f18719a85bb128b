//! Type-safe property keys and the property bag injected into the backend.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use crate::errors::{LogConfError, Result};

/// A validated context property key.
///
/// Keys must:
/// - Be non-empty
/// - Contain no whitespace
/// - Contain none of `$`, `{`, `}` (they delimit substitutions)
///
/// # Example
///
/// ```
/// use logconf_types::PropertyKey;
///
/// let key = PropertyKey::new("application.home").unwrap();
/// assert_eq!(key.as_str(), "application.home");
///
/// assert!(PropertyKey::new("").is_err());
/// assert!(PropertyKey::new("${nested}").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyKey(String);

impl PropertyKey {
    /// Create a new validated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key doesn't meet validation requirements.
    pub fn new(key: impl AsRef<str>) -> Result<Self> {
        let key = key.as_ref();
        if !Self::is_valid(key) {
            return Err(LogConfError::Validation(format!(
                "Invalid property key '{}': must be non-empty and contain no whitespace, '$', '{{' or '}}'",
                key
            )));
        }
        Ok(Self(key.to_string()))
    }

    /// Check if a key is valid without allocating.
    pub fn is_valid(key: &str) -> bool {
        !key.is_empty()
            && !key
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '$' | '{' | '}'))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PropertyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for PropertyKey {
    type Err = LogConfError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for PropertyKey {
    type Error = LogConfError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PropertyKey> for String {
    fn from(key: PropertyKey) -> Self {
        key.0
    }
}

/// String properties seeded into the backend context as variables.
///
/// Values are always present strings; an absent key is distinct from an
/// empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(BTreeMap<PropertyKey, String>);

impl PropertyBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) -> Result<()> {
        let key = PropertyKey::new(key)?;
        self.0.insert(key, value.into());
        Ok(())
    }

    /// Look up a property value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether the bag holds the key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Merge `other` into this bag; `other` wins on key collisions.
    pub fn merge(&mut self, other: &PropertyBag) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Extend<(PropertyKey, String)> for PropertyBag {
    fn extend<I: IntoIterator<Item = (PropertyKey, String)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<(PropertyKey, String)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (PropertyKey, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_key_validation() {
        assert!(PropertyKey::new("application.home").is_ok());
        assert!(PropertyKey::new("LOG_DIR").is_ok());
        assert!(PropertyKey::new("server-id").is_ok());

        assert!(PropertyKey::new("").is_err());
        assert!(PropertyKey::new("has space").is_err());
        assert!(PropertyKey::new("a$b").is_err());
        assert!(PropertyKey::new("{x}").is_err());
    }

    #[test]
    fn test_empty_value_is_not_absent() {
        let mut bag = PropertyBag::new();
        bag.insert("empty", "").unwrap();
        assert_eq!(bag.get("empty"), Some(""));
        assert_eq!(bag.get("missing"), None);
        assert!(bag.contains_key("empty"));
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = PropertyBag::new();
        base.insert("a", "1").unwrap();
        base.insert("b", "2").unwrap();

        let mut overlay = PropertyBag::new();
        overlay.insert("b", "20").unwrap();
        overlay.insert("c", "30").unwrap();

        base.merge(&overlay);
        assert_eq!(base.len(), 3);
        assert_eq!(base.get("a"), Some("1"));
        assert_eq!(base.get("b"), Some("20"));
        assert_eq!(base.get("c"), Some("30"));
    }

    #[test]
    fn test_iteration_is_key_ordered() {
        let mut bag = PropertyBag::new();
        bag.insert("zeta", "z").unwrap();
        bag.insert("alpha", "a").unwrap();
        let keys: Vec<&str> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_deserialize_rejects_bad_keys() {
        let ok: PropertyBag = serde_json::from_str(r#"{"a.b": "c"}"#).unwrap();
        assert_eq!(ok.get("a.b"), Some("c"));
        assert!(serde_json::from_str::<PropertyBag>(r#"{"bad key": "c"}"#).is_err());
    }

    proptest::proptest! {
        #[test]
        fn test_dotted_identifiers_are_valid_keys(key in "[a-zA-Z_][a-zA-Z0-9_.-]{0,30}") {
            proptest::prop_assert!(PropertyKey::new(&key).is_ok());
        }

        #[test]
        fn test_keys_with_whitespace_are_rejected(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
            let key = format!("{} {}", a, b);
            proptest::prop_assert!(PropertyKey::new(key).is_err());
        }
    }
}
