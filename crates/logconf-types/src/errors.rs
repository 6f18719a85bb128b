//! Error types for logconf operations.

use thiserror::Error;

/// The main error type for logconf operations.
///
/// Only lifecycle and resolution failures surface here. Problems inside a
/// configuration document are reported through the backend status channel
/// instead.
#[derive(Error, Debug)]
pub enum LogConfError {
    /// Host configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Environment descriptor error
    #[error("Environment error: {0}")]
    Environment(String),

    /// The `logger.url` override could not be parsed as a URL
    #[error("Malformed logger URL '{value}': {source}")]
    MalformedUrl {
        /// The override text as supplied
        value: String,
        /// Parser failure
        #[source]
        source: url::ParseError,
    },

    /// A filesystem path could not be expressed as a `file:` URL
    #[error("Cannot build a file URL from path {0:?}")]
    InvalidPath(std::path::PathBuf),

    /// The backend context was found in an invalid internal state while
    /// being reset
    #[error("Logging backend is in an invalid internal state: {source}")]
    InvalidState {
        /// Backend failure that triggered the translation
        #[source]
        source: BackendError,
    },

    /// Any other backend failure
    #[error("Logging backend error: {0}")]
    Backend(#[from] BackendError),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Internal bug - should never happen in production
    #[error("Bug detected: {0}\n\nThis is an internal error. Please report this issue at:\nhttps://github.com/logconf/logconf-rs/issues")]
    Bug(String),
}

/// Failures reported by a logging backend implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Internal state of the backend is inconsistent (for example a lock
    /// poisoned by a panicking thread while the context was being mutated)
    #[error("internal state error: {0}")]
    InternalState(String),

    /// The subscriber the backend drives has been dropped
    #[error("subscriber gone: {0}")]
    SubscriberGone(String),

    /// Anything else
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for logconf operations.
pub type Result<T> = std::result::Result<T, LogConfError>;

impl LogConfError {
    /// Build a malformed URL error from override text and the parser failure.
    pub fn malformed_url(value: impl Into<String>, source: url::ParseError) -> Self {
        Self::MalformedUrl {
            value: value.into(),
            source,
        }
    }

    /// Translate a backend reset failure.
    ///
    /// Internal-state failures become [`LogConfError::InvalidState`]; every
    /// other failure is kept as [`LogConfError::Backend`].
    pub fn from_reset_failure(err: BackendError) -> Self {
        match err {
            BackendError::InternalState(_) => Self::InvalidState { source: err },
            other => Self::Backend(other),
        }
    }
}

/// Helper macro to create and return a LogConfError::Bug
///
/// This should be used for conditions that should never occur
/// in normal operation and indicate a bug in logconf itself.
///
/// # Example
///
/// ```ignore
/// if some_impossible_condition {
///     bug!("This should never happen: {:?}", condition);
/// }
/// ```
#[macro_export]
macro_rules! bug {
    ($msg:expr) => {
        return Err($crate::LogConfError::Bug($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogConfError::Bug(format!($fmt, $($arg)*)))
    };
}
