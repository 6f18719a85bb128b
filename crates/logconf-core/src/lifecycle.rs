//! Logging lifecycle: configure, reconfigure and shut down.
//!
//! [`LoggingController`] owns the wiring between a logging backend and the
//! `log` facade bridge. Every (re)configuration runs the same flat sequence
//! under one mutex: clear the bridge, register the level propagator, install
//! the bridge, reset the context, seed it, then apply the resolved document.

use logconf_types::{
    Environment, FacadeBridge, LogConfError, LoggingBackend, Mode, PropertyBag, PropertyLookup,
    Result, Status,
};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;
use crate::config::{Config, ProcessSettings};
use crate::facade::FRAMEWORK_PACKAGES;
use crate::mode::{self, ModeState};
use crate::propagator::LevelChangePropagator;
use crate::resolver::{self, SourceOverrides};
use crate::status::StatusPrinter;
use crate::util::fs::absolute;
use crate::properties;

type Diagnostics = Box<dyn Write + Send>;

/// Configures and tears down logging for one backend/bridge pair.
pub struct LoggingController {
    backend: Arc<dyn LoggingBackend>,
    bridge: Arc<dyn FacadeBridge>,
    mode: Arc<ModeState>,
    settings: Arc<dyn PropertyLookup>,
    diagnostics: Mutex<Diagnostics>,
    lock: Mutex<()>,
    configured: AtomicBool,
    last_statuses: Mutex<Vec<Status>>,
}

impl LoggingController {
    /// Create a controller using the process-wide mode, overrides read from
    /// the process environment and diagnostics on standard error.
    pub fn new(backend: Arc<dyn LoggingBackend>, bridge: Arc<dyn FacadeBridge>) -> Self {
        Self {
            backend,
            bridge,
            mode: mode::global(),
            settings: Arc::new(ProcessSettings),
            diagnostics: Mutex::new(Box::new(io::stderr())),
            lock: Mutex::new(()),
            configured: AtomicBool::new(false),
            last_statuses: Mutex::new(Vec::new()),
        }
    }

    /// Use `mode` instead of the process-wide mode state.
    pub fn with_mode_state(mut self, mode: Arc<ModeState>) -> Self {
        self.mode = mode;
        self
    }

    /// Read the `logger.*` overrides from `settings`.
    pub fn with_settings(mut self, settings: Arc<dyn PropertyLookup>) -> Self {
        self.settings = settings;
        self
    }

    /// Send operator diagnostics to `out`.
    pub fn with_diagnostics(self, out: impl Write + Send + 'static) -> Self {
        *self.diagnostics.lock() = Box::new(out);
        self
    }

    /// Bootstrap without a full environment: mode and home path only, using
    /// the bundled default for `mode`. Overrides are not consulted and the
    /// mode is left alone if anything fails.
    pub fn init_bare(&self, root_path: impl AsRef<Path>, mode: Mode) -> Result<()> {
        let root = absolute(root_path.as_ref())?;
        let props = properties::home_only(&root);
        let source = resolver::bundled_default(mode);
        self.apply_configuration(&props, source.as_ref())?;
        self.mode.set(mode);
        Ok(())
    }

    /// Configure with no host configuration and no explicit properties.
    pub fn configure(&self, env: &dyn Environment) -> Result<()> {
        self.configure_with(env, &Config::empty(), &PropertyBag::new())
    }

    /// Configure from an environment, host configuration and explicit
    /// properties.
    ///
    /// The source is resolved before anything is touched, so a malformed
    /// `logger.url` leaves the current configuration in place. The mode is
    /// recorded once the configuration has been applied.
    pub fn configure_with(
        &self,
        env: &dyn Environment,
        host_config: &Config,
        explicit: &PropertyBag,
    ) -> Result<()> {
        let overrides = SourceOverrides::from_lookup(self.settings.as_ref());
        let source = resolver::resolve(env, &overrides)?;
        let props = properties::build(env, host_config, explicit);

        self.apply_configuration(&props, source.as_ref())?;
        self.mode.set(env.mode());
        Ok(())
    }

    /// Reset the backend and apply `source`, seeded with `properties`.
    ///
    /// Problems inside the document do not fail this call; they are printed
    /// to the diagnostics stream and kept in [`Self::last_statuses`]. When
    /// the call itself fails the controller reports itself unconfigured.
    pub fn apply_configuration(&self, properties: &PropertyBag, source: Option<&Url>) -> Result<()> {
        let _guard = self.lock.lock();

        let applied = self.apply_locked(properties, source);
        if applied.is_err() {
            self.configured.store(false, Ordering::SeqCst);
            self.last_statuses.lock().clear();
        }
        applied
    }

    fn apply_locked(&self, properties: &PropertyBag, source: Option<&Url>) -> Result<()> {
        self.bridge.remove_handlers_for_root_logger();

        let context = self.backend.context();
        let mut configurator = context.configurator();

        context.add_listener(Arc::new(LevelChangePropagator::new(self.bridge.clone())));
        self.bridge.install()?;

        context.reset().map_err(LogConfError::from_reset_failure)?;

        for package in FRAMEWORK_PACKAGES {
            context.add_framework_package(package);
        }
        for (key, value) in properties.iter() {
            context.put_property(key, value);
        }

        match source {
            Some(url) => {
                configurator.do_configure(url);
                let statuses = context.statuses();
                self.report(&statuses);
                *self.last_statuses.lock() = statuses;
                info!(source = %url, "logging configured");
            }
            None => {
                self.last_statuses.lock().clear();
                self.diagnostic(
                    "logconf: no logging configuration found, nothing was configured",
                );
            }
        }

        self.configured.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Stop the backend, detach the bridge and clear the mode. Safe to call
    /// at any time, including repeatedly.
    pub fn shutdown(&self) {
        let _guard = self.lock.lock();

        self.backend.context().stop();
        self.bridge.uninstall();
        self.mode.unset();

        if self.configured.swap(false, Ordering::SeqCst) {
            debug!("logging shut down");
        }
    }

    /// Whether the last configuration has not been shut down yet.
    pub fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    /// Statuses recorded while applying the last document.
    pub fn last_statuses(&self) -> Vec<Status> {
        self.last_statuses.lock().clone()
    }

    fn report(&self, statuses: &[Status]) {
        let mut out = self.diagnostics.lock();
        if let Err(e) = StatusPrinter::print_if_errors_occurred(statuses, &mut **out) {
            warn!(error = %e, "failed to print logging statuses");
        }
    }

    fn diagnostic(&self, line: &str) {
        let mut out = self.diagnostics.lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!(error = %e, "failed to print logging diagnostic");
        }
    }
}
