//! Configuration document types.
//!
//! A logging configuration document is YAML. String fields may contain
//! `${name}` / `${name:-default}` references that the backend substitutes
//! before use, which is why levels and paths stay as raw strings here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root of a logging configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogDocument {
    /// Additional context properties, defined in document order
    #[serde(default)]
    pub properties: IndexMap<String, String>,

    /// Named appenders
    #[serde(default)]
    pub appenders: IndexMap<String, AppenderConfig>,

    /// Root logger
    #[serde(default)]
    pub root: RootConfig,

    /// Per-target level overrides
    #[serde(default)]
    pub loggers: IndexMap<String, String>,
}

/// Root logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootConfig {
    /// Root level
    #[serde(default = "default_root_level")]
    pub level: String,

    /// Names of the appenders attached to the root
    #[serde(default)]
    pub appenders: Vec<String>,
}

fn default_root_level() -> String {
    "debug".to_string()
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            level: default_root_level(),
            appenders: Vec::new(),
        }
    }
}

/// A single output destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppenderConfig {
    /// Destination kind
    pub kind: AppenderKind,

    /// Log file path (file and rolling appenders)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Rotation policy (rolling appenders)
    #[serde(default)]
    pub rotation: Rotation,

    /// Output format
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Whether to emit ANSI colors
    #[serde(default)]
    pub ansi: bool,

    /// Whether to print the event target
    #[serde(default = "default_true")]
    pub target: bool,

    /// Whether to print the source file and line of the call site
    #[serde(default)]
    pub caller: bool,

    /// Whether to print thread names
    #[serde(default)]
    pub thread_names: bool,
}

fn default_true() -> bool {
    true
}

fn default_log_format() -> LogFormat {
    LogFormat::Full
}

/// Kind of appender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppenderKind {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
    /// Single file, never rotated
    File,
    /// Time-rotated files
    Rolling,
}

/// File rotation period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// Rotate every minute
    Minutely,
    /// Rotate every hour
    Hourly,
    /// Rotate every day
    #[default]
    Daily,
    /// Never rotate
    Never,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default single-line format
    Full,
    /// Human-readable multi-line format
    Pretty,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document() {
        let doc: LogDocument = serde_yaml::from_str("root:\n  level: info\n").unwrap();
        assert_eq!(doc.root.level, "info");
        assert!(doc.appenders.is_empty());
        assert!(doc.root.appenders.is_empty());
    }

    #[test]
    fn test_appender_defaults() {
        let doc: LogDocument = serde_yaml::from_str(
            r#"
appenders:
  out:
    kind: rolling
    path: "${LOG_DIR}/app.log"
root:
  appenders: [out]
"#,
        )
        .unwrap();

        let out = &doc.appenders["out"];
        assert_eq!(out.kind, AppenderKind::Rolling);
        assert_eq!(out.rotation, Rotation::Daily);
        assert_eq!(out.format, LogFormat::Full);
        assert!(out.target);
        assert!(!out.ansi);
        assert_eq!(doc.root.level, "debug");
    }

    #[test]
    fn test_properties_keep_document_order() {
        let doc: LogDocument =
            serde_yaml::from_str("properties:\n  B: one\n  A: two\n").unwrap();
        let keys: Vec<&String> = doc.properties.keys().collect();
        assert_eq!(keys, vec!["B", "A"]);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(serde_yaml::from_str::<LogDocument>("rooot: {}\n").is_err());
    }
}
