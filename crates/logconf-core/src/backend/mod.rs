//! `tracing-subscriber` based logging engine.
//!
//! The subscriber is a [`Registry`] with two reloadable layers: an
//! [`EnvFilter`] deciding which events pass, and a list of output layers
//! built from the configuration document. Configuring, resetting and stopping
//! all happen by swapping those two layers through their reload handles, so
//! the subscriber itself can be installed once and never replaced.

mod appender;
mod configurator;
mod context;
mod subst;

pub use configurator::YamlConfigurator;
pub use context::TracingContext;
pub use subst::{substitute, Substituted};

use logconf_types::{BackendError, LogConfError, LogLevel, LoggerContext, LoggingBackend, Result};
use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::{reload, EnvFilter, Layer, Registry};

/// Subscriber the output layers are stacked on.
pub type Filtered = Layered<reload::Layer<EnvFilter, Registry>, Registry>;

/// A type-erased output layer.
pub type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// Level in effect before any document is applied and after a reset.
pub const DEFAULT_LEVEL: LogLevel = LogLevel::Debug;

/// Handle to the tracing engine.
pub struct TracingBackend {
    context: Arc<TracingContext>,
}

impl TracingBackend {
    /// Build a subscriber with empty outputs and the default filter.
    ///
    /// The returned [`Dispatch`] is not installed anywhere; use it with
    /// [`tracing::dispatcher::with_default`] for scoped use or call
    /// [`TracingBackend::init_global`] instead.
    pub fn new() -> (Self, Dispatch) {
        let (filter, filter_handle) =
            reload::Layer::new(EnvFilter::new(DEFAULT_LEVEL.as_directive()));
        let (outputs, outputs_handle) = reload::Layer::new(Vec::<BoxedLayer>::new());

        let subscriber = Registry::default().with(filter).with(outputs);
        let context = Arc::new(TracingContext::new(filter_handle, outputs_handle));

        (Self { context }, Dispatch::new(subscriber))
    }

    /// Build a backend and install its subscriber as the process-wide
    /// default. Fails if another global subscriber is already set.
    pub fn init_global() -> Result<Self> {
        let (backend, dispatch) = Self::new();
        tracing::dispatcher::set_global_default(dispatch).map_err(|e| {
            LogConfError::Backend(BackendError::Other(format!(
                "cannot install global subscriber: {}",
                e
            )))
        })?;
        Ok(backend)
    }

    /// The concrete context, for callers that need levels or properties.
    pub fn tracing_context(&self) -> Arc<TracingContext> {
        self.context.clone()
    }
}

impl LoggingBackend for TracingBackend {
    fn context(&self) -> Arc<dyn LoggerContext> {
        self.context.clone()
    }
}
