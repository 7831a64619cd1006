use crate::handler::Handler;
use crate::processor::Processor;
use std::sync::Arc;

/// The materialized handler and processor lists for one concrete channel.
#[derive(Clone, Default)]
pub struct Resolved {
    handlers: Vec<Arc<dyn Handler>>,
    processors: Vec<Arc<dyn Processor>>,
}

impl Resolved {
    #[must_use]
    pub const fn new(handlers: Vec<Arc<dyn Handler>>, processors: Vec<Arc<dyn Processor>>) -> Self {
        Self {
            handlers,
            processors,
        }
    }

    #[must_use]
    pub fn handlers(&self) -> &[Arc<dyn Handler>] {
        &self.handlers
    }

    #[must_use]
    pub fn processors(&self) -> &[Arc<dyn Processor>] {
        &self.processors
    }

    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }
}

impl std::fmt::Debug for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolved")
            .field("handlers", &self.handler_names())
            .field("processors", &self.processors.len())
            .finish()
    }
}
