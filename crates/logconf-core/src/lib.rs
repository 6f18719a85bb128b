//! # logconf Core
//!
//! Resolution, application and teardown of logging configuration on top of
//! a `tracing-subscriber` backend.
//!
//! This crate provides:
//!
//! - **Resolution**: picking the configuration document from overrides, the
//!   documented `logging.yml` and the bundled per-mode defaults
//! - **Properties**: the context variables seeded into the backend
//! - **Backend**: a reloadable `tracing` subscriber configured from YAML
//! - **Bridge**: routing of the `log` facade into `tracing`
//! - **Lifecycle**: serialized configure/reconfigure/shutdown
//! - **Configuration**: layered host configuration and process overrides
//!
//! ## Example
//!
//! ```no_run
//! use logconf_core::environment::AppEnvironment;
//! use logconf_types::Mode;
//!
//! let env = AppEnvironment::new("/srv/app", Mode::Prod)?;
//! logconf_core::log::configure(&env)?;
//!
//! tracing::info!("configured");
//!
//! logconf_core::log::shutdown();
//! # Ok::<(), logconf_types::LogConfError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod bridge;
pub mod config;
pub mod environment;
pub mod facade;
pub mod lifecycle;
pub mod log;
pub mod mode;
pub mod propagator;
pub mod properties;
pub mod resolver;
pub mod resources;
pub mod status;
pub mod util;

// Re-export commonly used items
pub use backend::TracingBackend;
pub use bridge::LogBridge;
pub use config::{Config, ProcessSettings};
pub use environment::AppEnvironment;
pub use facade::{Logger, ModeLogger};
pub use lifecycle::LoggingController;
pub use logconf_types::{LogConfError, Result};

/// logconf version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
