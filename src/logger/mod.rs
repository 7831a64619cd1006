//! The per-channel handle client code logs through.
//!
//! A logger dispatches to a snapshot of its resolved handlers and processors.
//! The router swaps that snapshot in one store whenever configuration
//! changes, so a record in flight sees either the old lists or the new ones.

use crate::Error;
use crate::filter::EmitFilter;
use crate::handler::Handler;
use crate::internal;
use crate::level::Level;
use crate::record::{Fields, Record, Value};
use crate::router::Resolved;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct Logger {
    channel: String,
    resolved: RwLock<Arc<Resolved>>,
    filter: RwLock<Option<Arc<dyn EmitFilter>>>,
    context: RwLock<Fields>,
    closed: AtomicBool,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("channel", &self.channel)
            .field("resolved", &*self.snapshot())
            .field("context", &*self.context.read())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// A standalone logger. Loggers handed out by a `Router` are built the same
    /// way and kept up to date by it.
    #[must_use]
    pub fn new(channel: impl Into<String>, resolved: impl Into<Arc<Resolved>>) -> Self {
        Self {
            channel: channel.into(),
            resolved: RwLock::new(resolved.into()),
            filter: RwLock::new(None),
            context: RwLock::new(Fields::new()),
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Builds a record from the global context merged with `context` (per-call
    /// keys win), runs the processors and hands the result to every handler
    /// accepting its level. Handler failures are reported through the crate
    /// diagnostics and never reach the caller.
    pub fn log(&self, level: Level, message: impl Into<String>, context: Fields) {
        let filter = self.filter.read().clone();
        if let Some(filter) = filter
            && !filter.should_emit(&self.channel, level)
        {
            return;
        }

        let resolved = self.snapshot();
        let mut merged = self.context.read().clone();
        merged.extend(context);

        let mut record = Record::new(self.channel.as_str(), level, message).with_context(merged);
        for processor in resolved.processors() {
            record = processor.process(record);
        }

        for handler in resolved.handlers() {
            if !handler.is_handling(record.level()) {
                continue;
            }
            if let Err(e) = handler.handle(&record) {
                internal::warn(
                    "LOGGER",
                    &format!(
                        "Handler '{}' failed on channel '{}': {e}",
                        handler.name(),
                        self.channel
                    ),
                );
            }
        }
    }

    /// [`log`](Self::log) with a numeric severity.
    ///
    /// # Errors
    /// `Error::InvalidLevel` when `weight` is not one of the eight level weights.
    pub fn log_weight(
        &self,
        weight: u16,
        message: impl Into<String>,
        context: Fields,
    ) -> Result<(), Error> {
        let level = Level::try_from(weight)?;
        self.log(level, message, context);
        Ok(())
    }

    pub fn debug(&self, message: impl Into<String>, context: Fields) {
        self.log(Level::Debug, message, context);
    }

    pub fn info(&self, message: impl Into<String>, context: Fields) {
        self.log(Level::Info, message, context);
    }

    pub fn notice(&self, message: impl Into<String>, context: Fields) {
        self.log(Level::Notice, message, context);
    }

    pub fn warning(&self, message: impl Into<String>, context: Fields) {
        self.log(Level::Warning, message, context);
    }

    pub fn error(&self, message: impl Into<String>, context: Fields) {
        self.log(Level::Error, message, context);
    }

    pub fn critical(&self, message: impl Into<String>, context: Fields) {
        self.log(Level::Critical, message, context);
    }

    pub fn alert(&self, message: impl Into<String>, context: Fields) {
        self.log(Level::Alert, message, context);
    }

    pub fn emergency(&self, message: impl Into<String>, context: Fields) {
        self.log(Level::Emergency, message, context);
    }

    /// Sets one key of the context attached to every record of this logger.
    pub fn set_context(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.context.write().insert(key, value);
    }

    /// Merges `fields` into the global context; incoming keys win.
    pub fn extend_context(&self, fields: Fields) {
        self.context.write().extend(fields);
    }

    pub fn remove_context(&self, key: &str) -> Option<Value> {
        self.context.write().remove(key)
    }

    pub fn clear_context(&self) {
        self.context.write().clear();
    }

    /// Copy of the global context.
    #[must_use]
    pub fn context(&self) -> Fields {
        self.context.read().clone()
    }

    /// Current handler/processor lists.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Resolved> {
        self.resolved.read().clone()
    }

    /// Flushes every handler, attempting all of them.
    ///
    /// # Errors
    /// The first handler failure.
    pub fn flush(&self) -> Result<(), Error> {
        let mut first = None;
        for handler in self.snapshot().handlers() {
            if let Err(e) = handler.flush() {
                internal::warn(
                    "LOGGER",
                    &format!("Flush of '{}' failed: {e}", handler.name()),
                );
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Closes every handler once. Later calls do nothing. Logging on a closed
    /// logger still dispatches; handlers reacquire their resources.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        close_all(self.snapshot().handlers());
        internal::trace("LOGGER", &format!("Closed logger '{}'", self.channel));
    }

    /// Marks this handle closed after its channel was reconfigured, closing
    /// only `stale`: the handlers its router no longer references.
    pub(crate) fn retire(&self, stale: &[Arc<dyn Handler>]) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        close_all(stale);
        internal::trace(
            "LOGGER",
            &format!("Retired logger '{}', closed {} handler(s)", self.channel, stale.len()),
        );
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn swap(&self, resolved: Arc<Resolved>) {
        *self.resolved.write() = resolved;
    }

    pub(crate) fn set_filter(&self, filter: Option<Arc<dyn EmitFilter>>) {
        *self.filter.write() = filter;
    }
}

fn close_all(handlers: &[Arc<dyn Handler>]) {
    for handler in handlers {
        if let Err(e) = handler.close() {
            internal::warn(
                "LOGGER",
                &format!("Close of '{}' failed: {e}", handler.name()),
            );
        }
    }
}
