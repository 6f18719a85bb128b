//! Backend status messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::StatusLevel;

/// A message recorded by the backend while it is reset or configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Severity
    pub level: StatusLevel,
    /// Component that recorded the message
    pub origin: String,
    /// Human-readable message
    pub message: String,
    /// When the message was recorded
    pub timestamp: DateTime<Utc>,
}

impl Status {
    /// Create a status stamped with the current time.
    pub fn new(level: StatusLevel, origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            origin: origin.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Informational status.
    pub fn info(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Info, origin, message)
    }

    /// Warning status.
    pub fn warn(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Warn, origin, message)
    }

    /// Error status.
    pub fn error(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Error, origin, message)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} |-{} in {} - {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.origin,
            self.message
        )
    }
}
