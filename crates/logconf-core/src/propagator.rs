//! Mirrors backend levels into the secondary facade's level gate.
//!
//! The `log` facade only consults a single global maximum level before
//! dispatching a record. Keeping that maximum in step with the most verbose
//! level configured in the backend means records the backend would discard
//! are never formatted or forwarded.

use logconf_types::{ContextListener, FacadeBridge, LogLevel};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Listener key of the propagator.
pub const PROPAGATOR_KEY: &str = "level-change-propagator";

/// Context listener that keeps the facade gate at the most verbose backend
/// level.
pub struct LevelChangePropagator {
    bridge: Arc<dyn FacadeBridge>,
    levels: Mutex<HashMap<String, LogLevel>>,
}

impl LevelChangePropagator {
    /// Create a propagator driving `bridge`.
    pub fn new(bridge: Arc<dyn FacadeBridge>) -> Self {
        Self {
            bridge,
            levels: Mutex::new(HashMap::new()),
        }
    }

    fn propagate(&self, levels: &HashMap<String, LogLevel>) {
        let max = levels.values().copied().max().unwrap_or(LogLevel::Off);
        trace!(level = %max, "propagating facade level");
        self.bridge.set_max_level(max);
    }
}

impl ContextListener for LevelChangePropagator {
    fn key(&self) -> &str {
        PROPAGATOR_KEY
    }

    fn is_reset_resistant(&self) -> bool {
        true
    }

    fn on_reset(&self) {
        let mut levels = self.levels.lock();
        levels.clear();
        self.propagate(&levels);
    }

    fn on_level_change(&self, logger: &str, level: LogLevel) {
        let mut levels = self.levels.lock();
        levels.insert(logger.to_string(), level);
        self.propagate(&levels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logconf_types::Result;

    mockall::mock! {
        Bridge {}
        impl FacadeBridge for Bridge {
            fn install(&self) -> Result<()>;
            fn uninstall(&self);
            fn remove_handlers_for_root_logger(&self);
            fn is_installed(&self) -> bool;
            fn handler_count(&self) -> usize;
            fn set_max_level(&self, level: LogLevel);
        }
    }

    #[test]
    fn test_reset_closes_gate() {
        let mut bridge = MockBridge::new();
        bridge
            .expect_set_max_level()
            .with(mockall::predicate::eq(LogLevel::Off))
            .times(1)
            .return_const(());

        let propagator = LevelChangePropagator::new(Arc::new(bridge));
        propagator.on_reset();
    }

    #[test]
    fn test_most_verbose_level_wins() {
        let mut seq = mockall::Sequence::new();
        let mut bridge = MockBridge::new();
        for level in [LogLevel::Info, LogLevel::Debug, LogLevel::Debug, LogLevel::Warn] {
            bridge
                .expect_set_max_level()
                .with(mockall::predicate::eq(level))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
        }

        let propagator = LevelChangePropagator::new(Arc::new(bridge));
        propagator.on_level_change("", LogLevel::Info);
        propagator.on_level_change("db", LogLevel::Debug);
        propagator.on_level_change("", LogLevel::Error);
        propagator.on_level_change("db", LogLevel::Warn);
    }

    #[test]
    fn test_identity() {
        let mut bridge = MockBridge::new();
        bridge.expect_set_max_level().return_const(());
        let propagator = LevelChangePropagator::new(Arc::new(bridge));
        assert_eq!(propagator.key(), PROPAGATOR_KEY);
        assert!(propagator.is_reset_resistant());
    }
}
