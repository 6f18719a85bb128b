//! # logconf Types
//!
//! Core types, traits, and enums shared across all logconf crates.
//!
//! This crate provides the fundamental building blocks for resolving and
//! applying logging configuration, including:
//!
//! - Validated property keys and the property bag seeded into the backend
//! - Enums for log levels, application modes and status severities
//! - The configuration document schema
//! - Capability traits for environments, backends and facade bridges
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use logconf_types::{Mode, PropertyBag};
//!
//! let mut props = PropertyBag::new();
//! props.insert("application.home", "/srv/app").unwrap();
//! assert_eq!(props.get("application.home"), Some("/srv/app"));
//!
//! let mode: Mode = "dev".parse().unwrap();
//! assert_eq!(mode.default_resource(), "logging-dev.yml");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod identifiers;
pub mod enums;
pub mod traits;
pub mod config;
pub mod status;

// Re-export common types for convenience
pub use errors::{BackendError, LogConfError, Result};
pub use identifiers::{PropertyBag, PropertyKey};
pub use enums::{LogLevel, Mode, StatusLevel};
pub use status::Status;
pub use traits::{
    Configurator, ContextListener, Environment, FacadeBridge, FrameworkFilter, LoggerContext,
    LoggingBackend, PropertyLookup,
};

/// Documented name of a project-supplied configuration document.
pub const PRIMARY_RESOURCE: &str = "logging.yml";

/// Bundled default configuration used in Dev mode.
pub const DEV_DEFAULT_RESOURCE: &str = "logging-dev.yml";

/// Bundled default configuration used in every other mode.
pub const DEFAULT_RESOURCE: &str = "logging-default.yml";

/// Context property always carrying the absolute application root.
pub const HOME_PROPERTY: &str = "application.home";
