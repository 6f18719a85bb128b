//! Status channel of the backend context.

use logconf_types::{Status, StatusLevel};
use parking_lot::Mutex;
use std::io::{self, Write};

/// Collects status messages recorded while a context is reset or configured.
#[derive(Debug, Default)]
pub struct StatusManager {
    statuses: Mutex<Vec<Status>>,
}

impl StatusManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status.
    pub fn add(&self, status: Status) {
        self.statuses.lock().push(status);
    }

    /// Snapshot of the recorded statuses.
    pub fn statuses(&self) -> Vec<Status> {
        self.statuses.lock().clone()
    }

    /// Drop every recorded status.
    pub fn clear(&self) {
        self.statuses.lock().clear();
    }
}

/// Prints statuses to an operator-visible stream.
pub struct StatusPrinter;

impl StatusPrinter {
    /// Print every status when any of them is a warning or an error.
    ///
    /// Returns whether anything was printed.
    pub fn print_if_errors_occurred(statuses: &[Status], out: &mut dyn Write) -> io::Result<bool> {
        let troubled = statuses.iter().any(|s| s.level >= StatusLevel::Warn);
        if troubled {
            Self::print(statuses, out)?;
        }
        Ok(troubled)
    }

    /// Print every status.
    pub fn print(statuses: &[Status], out: &mut dyn Write) -> io::Result<()> {
        for status in statuses {
            writeln!(out, "{}", status)?;
        }
        out.flush()
    }
}
