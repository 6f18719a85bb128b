//! Application-facing loggers.
//!
//! [`Logger`] writes through the `log` facade, so its records reach the
//! backend via the bridge. Every method is `#[track_caller]`: the record
//! carries the file and line of the code that called the logger, while its
//! module path names this module. The backend registers both types here as
//! framework packages, and the forwarder drops that module path, so output
//! shows only the caller's file and line (appenders with `caller: true`).
//!
//! [`ModeLogger`] adds the application-mode rules on top.

use logconf_types::Mode;
use std::error::Error as StdError;
use std::fmt::{self, Display, Write as _};
use std::panic::Location;
use std::sync::Arc;
use crate::mode::{self, ModeState};

/// Type paths the backend skips when attributing facade records.
pub const FRAMEWORK_PACKAGES: [&str; 2] = [
    concat!(module_path!(), "::Logger"),
    concat!(module_path!(), "::ModeLogger"),
];

/// A named logger writing through the `log` facade.
#[derive(Clone)]
pub struct Logger {
    target: String,
    mode: Arc<ModeState>,
    sink: Option<Arc<dyn log::Log>>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("target", &self.target)
            .field("mode", &self.mode.get())
            .finish()
    }
}

impl Logger {
    /// Logger for `target`, reading the process-wide application mode.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            mode: mode::global(),
            sink: None,
        }
    }

    /// Read the application mode from `mode` instead.
    pub fn with_mode_state(mut self, mode: Arc<ModeState>) -> Self {
        self.mode = mode;
        self
    }

    /// Send records to `sink` instead of the global `log` logger.
    pub fn with_sink(mut self, sink: Arc<dyn log::Log>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The logger's target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether a record at `level` would be dispatched.
    pub fn is_enabled(&self, level: log::Level) -> bool {
        let metadata = log::Metadata::builder()
            .level(level)
            .target(&self.target)
            .build();
        match &self.sink {
            Some(sink) => sink.enabled(&metadata),
            None => level <= log::max_level() && log::logger().enabled(&metadata),
        }
    }

    /// Log `args` at `level`, attributed to the caller.
    #[track_caller]
    pub fn log(&self, level: log::Level, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }
        let caller = Location::caller();
        let record = log::Record::builder()
            .args(args)
            .level(level)
            .target(&self.target)
            .module_path_static(Some(module_path!()))
            .file_static(Some(caller.file()))
            .line(Some(caller.line()))
            .build();
        match &self.sink {
            Some(sink) => sink.log(&record),
            None => log::logger().log(&record),
        }
    }

    /// Log `message` at error level.
    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.log(log::Level::Error, format_args!("{}", message));
    }

    /// Log `message` at warn level.
    #[track_caller]
    pub fn warn(&self, message: impl Display) {
        self.log(log::Level::Warn, format_args!("{}", message));
    }

    /// Log `message` at info level.
    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.log(log::Level::Info, format_args!("{}", message));
    }

    /// Log `message` at debug level.
    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.log(log::Level::Debug, format_args!("{}", message));
    }

    /// Log `message` at trace level.
    #[track_caller]
    pub fn trace(&self, message: impl Display) {
        self.log(log::Level::Trace, format_args!("{}", message));
    }

    /// Log an error together with its cause.
    ///
    /// In Dev mode the whole source chain of `cause` is written; otherwise
    /// only its top-level message.
    #[track_caller]
    pub fn error_with_cause(&self, message: impl Display, cause: &(dyn StdError + 'static)) {
        if !self.is_enabled(log::Level::Error) {
            return;
        }
        let text = render_cause(&message, cause, self.mode.is(Mode::Dev));
        self.log(log::Level::Error, format_args!("{}", text));
    }
}

fn render_cause(message: &dyn Display, cause: &(dyn StdError + 'static), full: bool) -> String {
    let mut text = format!("{}: {}", message, cause);
    if full {
        let mut source = cause.source();
        while let Some(err) = source {
            // Writing to a String cannot fail
            let _ = write!(text, "\n  caused by: {}", err);
            source = err.source();
        }
    }
    text
}

/// A [`Logger`] that stays quiet below info level in Test mode.
#[derive(Debug, Clone)]
pub struct ModeLogger {
    inner: Logger,
}

impl ModeLogger {
    /// Wrap `inner`.
    pub fn new(inner: Logger) -> Self {
        Self { inner }
    }

    /// The wrapped logger.
    pub fn inner(&self) -> &Logger {
        &self.inner
    }

    fn suppressed(&self, level: log::Level) -> bool {
        level >= log::Level::Debug && self.inner.mode.is(Mode::Test)
    }

    /// Whether a record at `level` would be dispatched.
    pub fn is_enabled(&self, level: log::Level) -> bool {
        !self.suppressed(level) && self.inner.is_enabled(level)
    }

    /// Log `args` at `level` unless the mode suppresses it.
    #[track_caller]
    pub fn log(&self, level: log::Level, args: fmt::Arguments<'_>) {
        if !self.suppressed(level) {
            self.inner.log(level, args);
        }
    }

    /// Log `message` at error level.
    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.inner.error(message);
    }

    /// Log `message` at warn level.
    #[track_caller]
    pub fn warn(&self, message: impl Display) {
        self.inner.warn(message);
    }

    /// Log `message` at info level.
    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.inner.info(message);
    }

    /// Log `message` at debug level.
    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.log(log::Level::Debug, format_args!("{}", message));
    }

    /// Log `message` at trace level.
    #[track_caller]
    pub fn trace(&self, message: impl Display) {
        self.log(log::Level::Trace, format_args!("{}", message));
    }

    /// See [`Logger::error_with_cause`].
    #[track_caller]
    pub fn error_with_cause(&self, message: impl Display, cause: &(dyn StdError + 'static)) {
        self.inner.error_with_cause(message, cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Captured {
        level: log::Level,
        message: String,
        module: Option<String>,
        file: Option<String>,
        line: Option<u32>,
    }

    #[derive(Default)]
    struct Capture {
        records: Mutex<Vec<Captured>>,
    }

    impl log::Log for Capture {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            self.records.lock().push(Captured {
                level: record.level(),
                message: record.args().to_string(),
                module: record.module_path().map(str::to_string),
                file: record.file().map(str::to_string),
                line: record.line(),
            });
        }

        fn flush(&self) {}
    }

    #[derive(Debug)]
    struct Leaf;

    impl Display for Leaf {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "disk full")
        }
    }

    impl StdError for Leaf {}

    #[derive(Debug)]
    struct Wrapper(Leaf);

    impl Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "cannot write log file")
        }
    }

    impl StdError for Wrapper {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    fn logger(mode: Option<Mode>) -> (Logger, Arc<Capture>) {
        let state = Arc::new(ModeState::new());
        if let Some(mode) = mode {
            state.set(mode);
        }
        let capture = Arc::new(Capture::default());
        let logger = Logger::new("app")
            .with_mode_state(state)
            .with_sink(capture.clone());
        (logger, capture)
    }

    #[test]
    fn test_framework_packages_name_the_facade_types() {
        assert_eq!(
            FRAMEWORK_PACKAGES,
            ["logconf_core::facade::Logger", "logconf_core::facade::ModeLogger"]
        );
    }

    #[test]
    fn test_records_carry_the_call_site() {
        let (logger, capture) = logger(None);
        let line = line!() + 1;
        logger.info("hello");

        let records = capture.records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "hello");
        assert_eq!(records[0].file.as_deref(), Some(file!()));
        assert_eq!(records[0].line, Some(line));
        assert_eq!(records[0].module.as_deref(), Some("logconf_core::facade"));
    }

    #[test]
    fn test_call_site_survives_mode_logger() {
        let (logger, capture) = logger(Some(Mode::Prod));
        let logger = ModeLogger::new(logger);
        let line = line!() + 1;
        logger.debug("through the wrapper");

        assert_eq!(capture.records.lock()[0].line, Some(line));
    }

    #[test]
    fn test_cause_chain_only_in_dev() {
        let err = Wrapper(Leaf);

        let (dev, dev_capture) = logger(Some(Mode::Dev));
        dev.error_with_cause("flush failed", &err);
        assert_eq!(
            dev_capture.records.lock()[0].message,
            "flush failed: cannot write log file\n  caused by: disk full"
        );

        let (prod, prod_capture) = logger(Some(Mode::Prod));
        prod.error_with_cause("flush failed", &err);
        assert_eq!(
            prod_capture.records.lock()[0].message,
            "flush failed: cannot write log file"
        );
    }

    #[test]
    fn test_mode_logger_quiet_in_test_mode() {
        let (inner, capture) = logger(Some(Mode::Test));
        let logger = ModeLogger::new(inner);

        logger.trace("t");
        logger.debug("d");
        logger.info("i");
        logger.error("e");

        let levels: Vec<_> = capture.records.lock().iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![log::Level::Info, log::Level::Error]);
        assert!(!logger.is_enabled(log::Level::Debug));
        assert!(logger.is_enabled(log::Level::Warn));
    }

    #[test]
    fn test_mode_logger_verbose_outside_test_mode() {
        let (inner, capture) = logger(None);
        let logger = ModeLogger::new(inner);
        logger.trace("t");
        logger.debug("d");
        assert_eq!(capture.records.lock().len(), 2);
    }
}
