//! Application mode shared with the logging facade.
//!
//! The mode is process-wide state: it is set when logging is initialized
//! and cleared on shutdown. Reads and writes are atomic; they are not
//! ordered against a concurrent reconfiguration.

use logconf_types::Mode;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const UNSET: u8 = 0;
const DEV: u8 = 1;
const TEST: u8 = 2;
const PROD: u8 = 3;

/// Current application mode, or unset.
#[derive(Debug, Default)]
pub struct ModeState {
    mode: AtomicU8,
}

impl ModeState {
    /// Create an unset state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the application mode.
    pub fn set(&self, mode: Mode) {
        let raw = match mode {
            Mode::Dev => DEV,
            Mode::Test => TEST,
            Mode::Prod => PROD,
        };
        self.mode.store(raw, Ordering::Release);
    }

    /// Clear the application mode.
    pub fn unset(&self) {
        self.mode.store(UNSET, Ordering::Release);
    }

    /// The current mode, if set.
    pub fn get(&self) -> Option<Mode> {
        match self.mode.load(Ordering::Acquire) {
            DEV => Some(Mode::Dev),
            TEST => Some(Mode::Test),
            PROD => Some(Mode::Prod),
            _ => None,
        }
    }

    /// Whether the current mode is `mode`.
    pub fn is(&self, mode: Mode) -> bool {
        self.get() == Some(mode)
    }
}

/// The process-wide mode state used by the facade and the global controller.
pub fn global() -> Arc<ModeState> {
    static INSTANCE: Lazy<Arc<ModeState>> = Lazy::new(|| Arc::new(ModeState::new()));
    INSTANCE.clone()
}
