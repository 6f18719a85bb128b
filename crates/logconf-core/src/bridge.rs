//! Bridge from the `log` facade into `tracing`.
//!
//! [`LogBridge`] plays the part of the facade's root logger: it owns a list
//! of handlers and hands every record to each of them. Installing the bridge
//! attaches a handler that forwards records to the current `tracing`
//! dispatcher.
//!
//! Only [`LogBridge::global`] is registered with the `log` crate; other
//! instances receive records only when called directly. Likewise only the
//! global bridge pushes its level into `log::set_max_level`; every bridge
//! applies its own level to the records it is handed.

use logconf_types::{FacadeBridge, FrameworkFilter, LogLevel, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::{Arc, Once};
use tracing::debug;

/// Name of the handler that forwards records to `tracing`.
pub const FORWARDER: &str = "tracing-forwarder";

type FilterSlot = Arc<RwLock<Option<Arc<dyn FrameworkFilter>>>>;

struct Handler {
    name: String,
    sink: Arc<dyn log::Log>,
}

/// Root logger of the `log` facade.
pub struct LogBridge {
    handlers: RwLock<Vec<Handler>>,
    framework: FilterSlot,
    max_level: RwLock<log::LevelFilter>,
    registered: bool,
}

impl LogBridge {
    /// A bridge with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            framework: Arc::new(RwLock::new(None)),
            max_level: RwLock::new(log::LevelFilter::Trace),
            registered: false,
        }
    }

    /// The process-wide bridge, registered as the `log` crate's logger on
    /// first use.
    pub fn global() -> &'static LogBridge {
        static BRIDGE: Lazy<LogBridge> = Lazy::new(|| LogBridge {
            registered: true,
            ..LogBridge::new()
        });
        static REGISTER: Once = Once::new();

        let bridge: &'static LogBridge = &BRIDGE;
        REGISTER.call_once(|| {
            if log::set_logger(bridge).is_err() {
                eprintln!("logconf: another `log` logger is already registered, facade records will not be bridged");
            }
        });
        bridge
    }

    /// Consult `filter` when attributing forwarded records.
    pub fn set_framework_filter(&self, filter: Arc<dyn FrameworkFilter>) {
        *self.framework.write() = Some(filter);
    }

    /// Attach a handler to the root logger.
    pub fn add_handler(&self, name: impl Into<String>, sink: Arc<dyn log::Log>) {
        self.handlers.write().push(Handler {
            name: name.into(),
            sink,
        });
    }

    /// Most verbose level this bridge lets through.
    pub fn max_level(&self) -> log::LevelFilter {
        *self.max_level.read()
    }

    /// Names of the attached handlers, in attachment order.
    pub fn handler_names(&self) -> Vec<String> {
        self.handlers.read().iter().map(|h| h.name.clone()).collect()
    }
}

impl Default for LogBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.max_level()
            && self.handlers.read().iter().any(|h| h.sink.enabled(metadata))
    }

    fn log(&self, record: &log::Record<'_>) {
        if record.level() > self.max_level() {
            return;
        }
        for handler in self.handlers.read().iter() {
            if handler.sink.enabled(record.metadata()) {
                handler.sink.log(record);
            }
        }
    }

    fn flush(&self) {
        for handler in self.handlers.read().iter() {
            handler.sink.flush();
        }
    }
}

impl FacadeBridge for LogBridge {
    fn install(&self) -> Result<()> {
        let mut handlers = self.handlers.write();
        if handlers.iter().any(|h| h.name == FORWARDER) {
            return Ok(());
        }
        handlers.push(Handler {
            name: FORWARDER.to_string(),
            sink: Arc::new(TracingForwarder {
                framework: self.framework.clone(),
            }),
        });
        debug!("log facade bridged into tracing");
        Ok(())
    }

    fn uninstall(&self) {
        self.handlers.write().retain(|h| h.name != FORWARDER);
    }

    fn remove_handlers_for_root_logger(&self) {
        self.handlers.write().clear();
    }

    fn is_installed(&self) -> bool {
        self.handlers.read().iter().any(|h| h.name == FORWARDER)
    }

    fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    fn set_max_level(&self, level: LogLevel) {
        let filter = to_log_filter(level);
        *self.max_level.write() = filter;
        if self.registered {
            log::set_max_level(filter);
        }
    }
}

/// Handle to [`LogBridge::global`] usable where an owned bridge is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalBridge;

impl FacadeBridge for GlobalBridge {
    fn install(&self) -> Result<()> {
        LogBridge::global().install()
    }

    fn uninstall(&self) {
        LogBridge::global().uninstall()
    }

    fn remove_handlers_for_root_logger(&self) {
        LogBridge::global().remove_handlers_for_root_logger()
    }

    fn is_installed(&self) -> bool {
        LogBridge::global().is_installed()
    }

    fn handler_count(&self) -> usize {
        LogBridge::global().handler_count()
    }

    fn set_max_level(&self, level: LogLevel) {
        LogBridge::global().set_max_level(level)
    }
}

/// Hands `log` records to the current `tracing` dispatcher.
struct TracingForwarder {
    framework: FilterSlot,
}

impl TracingForwarder {
    fn from_framework(&self, record: &log::Record<'_>) -> bool {
        match (record.module_path(), self.framework.read().as_ref()) {
            (Some(module), Some(filter)) => filter.is_framework_frame(module),
            _ => false,
        }
    }
}

impl log::Log for TracingForwarder {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        // Records dispatched through a facade type carry the facade's module
        // path; the file and line already point at the real call site.
        let result = if self.from_framework(record) {
            let attributed = log::Record::builder()
                .args(*record.args())
                .level(record.level())
                .target(record.target())
                .file(record.file())
                .line(record.line())
                .module_path(None)
                .build();
            tracing_log::format_trace(&attributed)
        } else {
            tracing_log::format_trace(record)
        };
        if let Err(e) = result {
            eprintln!("logconf: failed to forward log record: {}", e);
        }
    }

    fn flush(&self) {}
}

/// Map a level to the `log` crate's filter.
pub fn to_log_filter(level: LogLevel) -> log::LevelFilter {
    match level {
        LogLevel::Off => log::LevelFilter::Off,
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warn => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
        LogLevel::Trace => log::LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Capture {
        records: Mutex<Vec<(String, Option<String>)>>,
    }

    impl log::Log for Capture {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            self.records
                .lock()
                .push((record.args().to_string(), record.module_path().map(str::to_string)));
        }

        fn flush(&self) {}
    }

    struct Prefix(&'static str);

    impl FrameworkFilter for Prefix {
        fn is_framework_frame(&self, module_path: &str) -> bool {
            module_path.starts_with(self.0)
        }
    }

    fn record<'a>(args: std::fmt::Arguments<'a>, module: Option<&'a str>) -> log::Record<'a> {
        log::Record::builder()
            .args(args)
            .level(log::Level::Info)
            .target("app")
            .module_path(module)
            .build()
    }

    #[test]
    fn test_install_is_idempotent() {
        let bridge = LogBridge::new();
        bridge.install().unwrap();
        bridge.install().unwrap();
        assert!(bridge.is_installed());
        assert_eq!(bridge.handler_count(), 1);

        bridge.uninstall();
        assert!(!bridge.is_installed());
        assert_eq!(bridge.handler_count(), 0);
    }

    #[test]
    fn test_remove_handlers_clears_everything() {
        let bridge = LogBridge::new();
        bridge.add_handler("capture", Arc::new(Capture::default()));
        bridge.install().unwrap();
        assert_eq!(bridge.handler_names(), vec!["capture", FORWARDER]);

        bridge.remove_handlers_for_root_logger();
        assert_eq!(bridge.handler_count(), 0);
        assert!(!bridge.is_installed());
    }

    #[test]
    fn test_records_reach_every_handler() {
        let bridge = LogBridge::new();
        let capture = Arc::new(Capture::default());
        bridge.add_handler("capture", capture.clone());

        bridge.log(&record(format_args!("hello"), Some("app::db")));
        bridge.log(&record(format_args!("again"), None));

        let records = capture.records.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ("hello".to_string(), Some("app::db".to_string())));
    }

    #[test]
    fn test_framework_detection() {
        let slot: FilterSlot = Arc::new(RwLock::new(None));
        let forwarder = TracingForwarder {
            framework: slot.clone(),
        };
        let facade = Some("logconf_core::facade");
        assert!(!forwarder.from_framework(&record(format_args!("x"), facade)));

        *slot.write() = Some(Arc::new(Prefix("logconf_core::facade")));
        assert!(forwarder.from_framework(&record(format_args!("x"), facade)));
        assert!(!forwarder.from_framework(&record(format_args!("x"), Some("app"))));
        assert!(!forwarder.from_framework(&record(format_args!("x"), None)));
    }

    #[test]
    fn test_private_bridge_keeps_level_to_itself() {
        let bridge = LogBridge::new();
        let capture = Arc::new(Capture::default());
        bridge.add_handler("capture", capture.clone());
        let global_before = log::max_level();

        bridge.set_max_level(LogLevel::Warn);

        assert_eq!(bridge.max_level(), log::LevelFilter::Warn);
        assert_eq!(log::max_level(), global_before);
        bridge.log(&record(format_args!("dropped"), Some("app")));
        let warning = log::Record::builder()
            .args(format_args!("kept"))
            .level(log::Level::Warn)
            .target("app")
            .build();
        bridge.log(&warning);
        assert_eq!(capture.records.lock().len(), 1);
        assert_eq!(capture.records.lock()[0].0, "kept");
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(to_log_filter(LogLevel::Off), log::LevelFilter::Off);
        assert_eq!(to_log_filter(LogLevel::Warn), log::LevelFilter::Warn);
        assert_eq!(to_log_filter(LogLevel::Trace), log::LevelFilter::Trace);
    }
}
