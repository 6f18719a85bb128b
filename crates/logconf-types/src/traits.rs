//! Core trait definitions for the logconf abstractions.
//!
//! The lifecycle controller only ever talks to the logging engine and the
//! secondary facade through these traits.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;
use crate::errors::{BackendError, Result};
use crate::{LogLevel, Mode, PropertyBag, Status};

/// Host environment descriptor.
pub trait Environment: Send + Sync {
    /// Absolute application root directory.
    fn root_path(&self) -> &Path;

    /// Application mode.
    fn mode(&self) -> Mode;

    /// Look up a named resource on the environment's resource path.
    fn resource(&self, name: &str) -> Option<Url>;

    /// Resolve a path relative to the application root.
    fn get_file(&self, relative: &str) -> PathBuf {
        self.root_path().join(relative)
    }
}

/// Read-only string-keyed settings.
pub trait PropertyLookup: Send + Sync {
    /// Look up a value by dotted key.
    fn lookup(&self, key: &str) -> Option<String>;
}

impl PropertyLookup for PropertyBag {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }
}

impl PropertyLookup for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Observer of backend context lifecycle events.
pub trait ContextListener: Send + Sync {
    /// Identity of the listener; a context keeps at most one listener per key.
    fn key(&self) -> &str;

    /// Whether the listener survives a context reset.
    fn is_reset_resistant(&self) -> bool;

    /// Called when the context is reset, before listeners are pruned.
    fn on_reset(&self);

    /// Called when the context is stopped.
    fn on_stop(&self) {}

    /// Called when the effective level of a logger changes.
    ///
    /// The root logger is reported with an empty name.
    fn on_level_change(&self, logger: &str, level: LogLevel);
}

/// Applies a backend-native configuration document to a context.
pub trait Configurator {
    /// Apply the document at `source`.
    ///
    /// Document problems are recorded on the context's status channel rather
    /// than returned.
    fn do_configure(&mut self, source: &Url);
}

/// The logging engine's live, mutable runtime state.
pub trait LoggerContext: Send + Sync {
    /// Clear all configuration state.
    fn reset(&self) -> std::result::Result<(), BackendError>;

    /// Stop the context, releasing appenders. Never fails.
    fn stop(&self);

    /// Register a listener, replacing any listener with the same key.
    fn add_listener(&self, listener: Arc<dyn ContextListener>);

    /// Number of registered listeners.
    fn listener_count(&self) -> usize;

    /// Set a context variable, overwriting any existing value.
    fn put_property(&self, key: &str, value: &str);

    /// Read a context variable.
    fn property(&self, key: &str) -> Option<String>;

    /// Register a type path that caller-location inference must skip.
    fn add_framework_package(&self, name: &str);

    /// Registered framework packages, in registration order.
    fn framework_packages(&self) -> Vec<String>;

    /// Status messages recorded since the last reset.
    fn statuses(&self) -> Vec<Status>;

    /// Build a configurator bound to this context.
    fn configurator(&self) -> Box<dyn Configurator + '_>;
}

/// Entry point to a logging engine.
pub trait LoggingBackend: Send + Sync {
    /// The engine's context.
    fn context(&self) -> Arc<dyn LoggerContext>;
}

/// Bridge that funnels a secondary logging API into the backend.
pub trait FacadeBridge: Send + Sync {
    /// Route the secondary API into the backend.
    fn install(&self) -> Result<()>;

    /// Stop routing the secondary API into the backend.
    fn uninstall(&self);

    /// Remove every handler attached to the secondary API's root logger.
    fn remove_handlers_for_root_logger(&self);

    /// Whether the routing handler is currently attached.
    fn is_installed(&self) -> bool;

    /// Number of handlers attached to the root logger.
    fn handler_count(&self) -> usize;

    /// Gate the secondary API at `level`.
    fn set_max_level(&self, level: LogLevel);
}

/// Decides whether a module path belongs to logging dispatch code.
pub trait FrameworkFilter: Send + Sync {
    /// True when `module_path` lies inside a registered framework package.
    fn is_framework_frame(&self, module_path: &str) -> bool;
}
