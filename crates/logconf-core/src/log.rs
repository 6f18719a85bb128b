//! Process-wide logging.
//!
//! The `log` crate and the global `tracing` dispatcher each accept a single
//! registration per process, so the controller driving them is created once,
//! on first use, and shared.

use logconf_types::{Environment, Mode, PropertyBag, Result};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;
use crate::backend::TracingBackend;
use crate::bridge::{GlobalBridge, LogBridge};
use crate::config::Config;
use crate::lifecycle::LoggingController;

static CONTROLLER: OnceCell<Arc<LoggingController>> = OnceCell::new();

/// The process-wide controller.
///
/// The first call installs the global `tracing` subscriber and registers
/// the `log` bridge; it fails if another subscriber was installed first.
pub fn controller() -> Result<Arc<LoggingController>> {
    CONTROLLER
        .get_or_try_init(|| {
            let backend = TracingBackend::init_global()?;
            LogBridge::global().set_framework_filter(backend.tracing_context());
            Ok(Arc::new(LoggingController::new(
                Arc::new(backend),
                Arc::new(GlobalBridge),
            )))
        })
        .cloned()
}

/// Bootstrap process-wide logging from the bundled default for `mode`.
pub fn init_bare(root_path: impl AsRef<Path>, mode: Mode) -> Result<()> {
    controller()?.init_bare(root_path, mode)
}

/// Configure process-wide logging for `env`.
pub fn configure(env: &dyn Environment) -> Result<()> {
    controller()?.configure(env)
}

/// Configure process-wide logging with host configuration and explicit
/// properties.
pub fn configure_with(env: &dyn Environment, host_config: &Config, explicit: &PropertyBag) -> Result<()> {
    controller()?.configure_with(env, host_config, explicit)
}

/// Shut down process-wide logging. Does nothing if it was never set up.
pub fn shutdown() {
    if let Some(controller) = CONTROLLER.get() {
        controller.shutdown();
    }
}
