//! Live state of the tracing backend.

use indexmap::{IndexMap, IndexSet};
use logconf_types::{
    BackendError, Configurator, ContextListener, FrameworkFilter, LogLevel, LoggerContext, Status,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{reload, EnvFilter, Registry};
use crate::status::StatusManager;
use super::configurator::YamlConfigurator;
use super::{BoxedLayer, Filtered, DEFAULT_LEVEL};

const ORIGIN: &str = "context";

#[derive(Default)]
struct ContextState {
    properties: HashMap<String, String>,
    listeners: Vec<Arc<dyn ContextListener>>,
    framework_packages: IndexSet<String>,
    levels: IndexMap<String, LogLevel>,
    guards: Vec<WorkerGuard>,
    started: bool,
}

/// Mutable runtime state of a [`TracingBackend`](super::TracingBackend).
///
/// The context drives the reloadable filter and output layers of the
/// subscriber it was created with.
pub struct TracingContext {
    state: Mutex<ContextState>,
    status: StatusManager,
    filter: reload::Handle<EnvFilter, Registry>,
    outputs: reload::Handle<Vec<BoxedLayer>, Filtered>,
}

impl TracingContext {
    pub(crate) fn new(
        filter: reload::Handle<EnvFilter, Registry>,
        outputs: reload::Handle<Vec<BoxedLayer>, Filtered>,
    ) -> Self {
        Self {
            state: Mutex::new(ContextState::default()),
            status: StatusManager::new(),
            filter,
            outputs,
        }
    }

    /// Whether a configuration is currently installed.
    pub fn is_started(&self) -> bool {
        self.state.lock().started
    }

    /// Effective level of a logger; the root logger has an empty name.
    pub fn level(&self, logger: &str) -> Option<LogLevel> {
        self.state.lock().levels.get(logger).copied()
    }

    /// Snapshot of all context properties.
    pub fn properties(&self) -> HashMap<String, String> {
        self.state.lock().properties.clone()
    }

    pub(crate) fn status(&self) -> &StatusManager {
        &self.status
    }

    /// Swap in a new filter and output set.
    pub(crate) fn install(
        &self,
        filter: EnvFilter,
        layers: Vec<BoxedLayer>,
        guards: Vec<WorkerGuard>,
    ) -> Result<(), BackendError> {
        self.outputs.reload(layers).map_err(classify)?;
        self.filter.reload(filter).map_err(classify)?;

        let previous = {
            let mut state = self.state.lock();
            state.started = true;
            std::mem::replace(&mut state.guards, guards)
        };
        // Flushes writers that belonged to the replaced outputs
        drop(previous);
        Ok(())
    }

    /// Record a logger level and tell listeners about it.
    pub(crate) fn set_level(&self, logger: &str, level: LogLevel) {
        let listeners = {
            let mut state = self.state.lock();
            state.levels.insert(logger.to_string(), level);
            state.listeners.clone()
        };
        for listener in listeners {
            listener.on_level_change(logger, level);
        }
    }
}

impl LoggerContext for TracingContext {
    fn reset(&self) -> Result<(), BackendError> {
        let listeners = self.state.lock().listeners.clone();
        for listener in &listeners {
            listener.on_reset();
        }

        let guards = {
            let mut state = self.state.lock();
            state.listeners.retain(|l| l.is_reset_resistant());
            state.properties.clear();
            state.levels.clear();
            state.started = false;
            std::mem::take(&mut state.guards)
        };
        self.status.clear();

        self.outputs.reload(Vec::new()).map_err(classify)?;
        self.filter
            .reload(EnvFilter::new(DEFAULT_LEVEL.as_directive()))
            .map_err(classify)?;
        drop(guards);

        self.set_level("", DEFAULT_LEVEL);
        Ok(())
    }

    fn stop(&self) {
        if let Err(e) = self.reset() {
            self.status
                .add(Status::warn(ORIGIN, format!("Reset while stopping failed: {}", e)));
        }
        let listeners = std::mem::take(&mut self.state.lock().listeners);
        for listener in listeners {
            listener.on_stop();
        }
    }

    fn add_listener(&self, listener: Arc<dyn ContextListener>) {
        let mut state = self.state.lock();
        state.listeners.retain(|l| l.key() != listener.key());
        state.listeners.push(listener);
    }

    fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    fn put_property(&self, key: &str, value: &str) {
        self.state
            .lock()
            .properties
            .insert(key.to_string(), value.to_string());
    }

    fn property(&self, key: &str) -> Option<String> {
        self.state.lock().properties.get(key).cloned()
    }

    fn add_framework_package(&self, name: &str) {
        self.state.lock().framework_packages.insert(name.to_string());
    }

    fn framework_packages(&self) -> Vec<String> {
        self.state.lock().framework_packages.iter().cloned().collect()
    }

    fn statuses(&self) -> Vec<Status> {
        self.status.statuses()
    }

    fn configurator(&self) -> Box<dyn Configurator + '_> {
        Box::new(YamlConfigurator::new(self))
    }
}

impl FrameworkFilter for TracingContext {
    fn is_framework_frame(&self, module_path: &str) -> bool {
        self.state
            .lock()
            .framework_packages
            .iter()
            .any(|package| covers(package, module_path))
    }
}

/// A registered name covers a module when it is the module, an ancestor of
/// it, or a type declared directly inside it.
fn covers(package: &str, module_path: &str) -> bool {
    if module_path == package {
        return true;
    }
    if let Some(rest) = module_path.strip_prefix(package) {
        if rest.starts_with("::") {
            return true;
        }
    }
    matches!(package.rsplit_once("::"), Some((parent, _)) if parent == module_path)
}

fn classify(err: reload::Error) -> BackendError {
    if err.is_poisoned() {
        BackendError::InternalState(err.to_string())
    } else if err.is_dropped() {
        BackendError::SubscriberGone(err.to_string())
    } else {
        BackendError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers() {
        assert!(covers("logconf_core::facade::Logger", "logconf_core::facade"));
        assert!(covers("logconf_core::facade", "logconf_core::facade"));
        assert!(covers("logconf_core::facade", "logconf_core::facade::inner"));
        assert!(!covers("logconf_core::facade::Logger", "logconf_core"));
        assert!(!covers("logconf_core::facade", "logconf_core::facades"));
        assert!(!covers("logconf_core::facade::Logger", "app::handlers"));
    }
}
