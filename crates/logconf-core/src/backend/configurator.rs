//! Applies YAML configuration documents to a [`TracingContext`].

use logconf_types::config::{AppenderKind, LogDocument};
use logconf_types::{Configurator, LogLevel, LoggerContext, PropertyKey, Status};
use std::fs;
use tracing_subscriber::EnvFilter;
use url::Url;
use crate::resources;
use super::appender;
use super::context::TracingContext;
use super::subst::substitute;
use super::DEFAULT_LEVEL;

const ORIGIN: &str = "configurator";

/// Configurator bound to one context.
///
/// Every problem found while reading or applying a document is recorded as
/// a status on the context; nothing is returned to the caller.
pub struct YamlConfigurator<'a> {
    context: &'a TracingContext,
}

impl<'a> YamlConfigurator<'a> {
    /// Bind a configurator to `context`.
    pub fn new(context: &'a TracingContext) -> Self {
        Self { context }
    }

    fn info(&self, message: impl Into<String>) {
        self.context.status().add(Status::info(ORIGIN, message));
    }

    fn warn(&self, message: impl Into<String>) {
        self.context.status().add(Status::warn(ORIGIN, message));
    }

    fn error(&self, message: impl Into<String>) {
        self.context.status().add(Status::error(ORIGIN, message));
    }

    fn fetch(&self, source: &Url) -> Option<String> {
        match source.scheme() {
            "file" => {
                let Ok(path) = source.to_file_path() else {
                    self.error(format!("Cannot map [{}] to a local path", source));
                    return None;
                };
                match fs::read_to_string(&path) {
                    Ok(text) => Some(text),
                    Err(e) => {
                        self.error(format!("Could not read [{}]: {}", path.display(), e));
                        None
                    }
                }
            }
            resources::SCHEME => match resources::load(source) {
                Some(text) => Some(text.to_string()),
                None => {
                    self.error(format!("No bundled resource named [{}]", source.path()));
                    None
                }
            },
            other => {
                self.error(format!("Unsupported configuration URL scheme [{}] in [{}]", other, source));
                None
            }
        }
    }

    /// Substitute against context properties, then process environment.
    fn expand(&self, text: &str) -> String {
        let expanded = substitute(text, |name| {
            self.context
                .property(name)
                .or_else(|| std::env::var(name).ok())
        });
        for name in &expanded.undefined {
            self.error(format!("Property [{}] is undefined", name));
        }
        expanded.value
    }

    fn parse_level(&self, what: &str, text: &str) -> Option<LogLevel> {
        match self.expand(text).parse::<LogLevel>() {
            Ok(level) => Some(level),
            Err(e) => {
                self.error(format!("Bad level for {}: {}", what, e));
                None
            }
        }
    }

    fn apply(&self, doc: LogDocument) {
        for (key, raw) in &doc.properties {
            if !PropertyKey::is_valid(key) {
                self.error(format!("Invalid property name [{}]", key));
                continue;
            }
            let value = self.expand(raw);
            self.context.put_property(key, &value);
        }

        let mut layers = Vec::new();
        let mut guards = Vec::new();
        for name in &doc.root.appenders {
            let Some(config) = doc.appenders.get(name) else {
                self.error(format!("Could not find an appender named [{}]", name));
                continue;
            };
            let path = match config.kind {
                AppenderKind::File | AppenderKind::Rolling => {
                    config.path.as_deref().map(|p| self.expand(p))
                }
                AppenderKind::Stdout | AppenderKind::Stderr => None,
            };
            match appender::build(name, config, path.as_deref()) {
                Ok(built) => {
                    layers.push(built.layer);
                    guards.extend(built.guard);
                }
                Err(message) => self.error(message),
            }
        }
        for name in doc.appenders.keys() {
            if !doc.root.appenders.contains(name) {
                self.warn(format!("Appender [{}] is defined but not attached to root", name));
            }
        }

        let root_level = self
            .parse_level("root", &doc.root.level)
            .unwrap_or(DEFAULT_LEVEL);
        let mut directives = vec![root_level.as_directive().to_string()];
        let mut logger_levels = Vec::new();
        for (target, raw) in &doc.loggers {
            if let Some(level) = self.parse_level(&format!("logger [{}]", target), raw) {
                directives.push(format!("{}={}", target, level.as_directive()));
                logger_levels.push((target.clone(), level));
            }
        }

        let filter = match EnvFilter::builder().parse(directives.join(",")) {
            Ok(filter) => filter,
            Err(e) => {
                self.error(format!("Invalid logger configuration: {}", e));
                return;
            }
        };

        let attached = layers.len();
        if let Err(e) = self.context.install(filter, layers, guards) {
            self.error(format!("Could not install configuration: {}", e));
            return;
        }

        self.context.set_level("", root_level);
        for (target, level) in logger_levels {
            self.context.set_level(&target, level);
        }
        self.info(format!(
            "Configuration applied: {} appender(s), root level {}",
            attached, root_level
        ));
    }
}

impl Configurator for YamlConfigurator<'_> {
    fn do_configure(&mut self, source: &Url) {
        self.info(format!("Processing configuration at [{}]", source));
        let Some(text) = self.fetch(source) else {
            return;
        };

        match serde_yaml::from_str::<Option<LogDocument>>(&text) {
            Ok(doc) => self.apply(doc.unwrap_or_default()),
            Err(e) => self.error(format!("Malformed configuration document [{}]: {}", source, e)),
        }
    }
}
