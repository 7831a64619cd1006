//! Channel router: maps channel names to handlers and processors.
//!
//! Configuration is attached to channel names; a concrete channel collects the
//! entries of every dot-prefix of its name, shortest first. Processors always
//! start from the defaults. Handlers fall back to the defaults only when no
//! prefix has an explicit handler entry.
//!
//! ```
//! use chanlog::{CollectorHandler, Router};
//! use std::sync::Arc;
//!
//! let router = Router::new();
//! let collector = Arc::new(CollectorHandler::new());
//! router.set_default_handler(collector.clone());
//!
//! let logger = router.channel("app.http").unwrap();
//! logger.info("listening", chanlog::Fields::new());
//! assert_eq!(collector.len(), 1);
//! ```

mod channel;
mod resolved;

pub use channel::{prefixes, validate as validate_channel};
pub use resolved::Resolved;

use crate::Error;
use crate::filter::EmitFilter;
use crate::handler::Handler;
use crate::internal;
use crate::logger::Logger;
use crate::processor::Processor;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Weak};

/// Explicit configuration for one channel name.
///
/// `handlers: None` means "inherit"; `Some(vec![])` is an explicit entry that
/// still suppresses the default handlers.
#[derive(Clone, Default)]
struct ChannelConfig {
    handlers: Option<Vec<Arc<dyn Handler>>>,
    processors: Vec<Arc<dyn Processor>>,
}

#[derive(Default)]
struct State {
    channels: HashMap<String, ChannelConfig>,
    default_handlers: Vec<Arc<dyn Handler>>,
    default_processors: Vec<Arc<dyn Processor>>,
    filter: Option<Arc<dyn EmitFilter>>,
    cache: HashMap<String, Arc<Resolved>>,
    live: BTreeMap<String, Arc<Logger>>,
    /// Replaced handles some caller may still hold. They follow every write
    /// like live loggers do.
    retired: Vec<Weak<Logger>>,
}

impl State {
    fn resolve(&mut self, name: &str) -> Arc<Resolved> {
        if let Some(hit) = self.cache.get(name) {
            return Arc::clone(hit);
        }

        let mut handlers = Vec::new();
        let mut explicit = false;
        let mut processors = self.default_processors.clone();

        for prefix in prefixes(name) {
            let Some(config) = self.channels.get(prefix) else {
                continue;
            };
            if let Some(list) = &config.handlers {
                explicit = true;
                handlers.extend(list.iter().cloned());
            }
            processors.extend(config.processors.iter().cloned());
        }
        if !explicit {
            handlers.clone_from(&self.default_handlers);
        }

        let resolved = Arc::new(Resolved::new(handlers, processors));
        self.cache.insert(name.to_string(), Arc::clone(&resolved));
        internal::trace("ROUTER", &format!("Resolved '{name}': {resolved:?}"));
        resolved
    }

    /// Whether any default or channel entry still references `handler`.
    fn is_attached(&self, handler: &Arc<dyn Handler>) -> bool {
        self.default_handlers
            .iter()
            .chain(
                self.channels
                    .values()
                    .filter_map(|c| c.handlers.as_ref())
                    .flatten(),
            )
            .any(|h| Arc::ptr_eq(h, handler))
    }

    /// Runs after every write. When `replaced` names a live channel, its logger
    /// is retired and returned together with the handlers that no entry
    /// references anymore.
    fn invalidate(
        &mut self,
        replaced: Option<&str>,
    ) -> Option<(Arc<Logger>, Vec<Arc<dyn Handler>>)> {
        self.cache.clear();
        internal::debug("ROUTER", "Resolution cache invalidated");

        let mut retired = None;
        if let Some(name) = replaced
            && let Some(old) = self.live.remove(name)
        {
            let resolved = self.resolve(name);
            let fresh = Arc::new(Logger::new(name, resolved));
            fresh.set_filter(self.filter.clone());
            fresh.extend_context(old.context());
            self.live.insert(name.to_string(), fresh);

            let stale: Vec<Arc<dyn Handler>> = old
                .snapshot()
                .handlers()
                .iter()
                .filter(|h| !self.is_attached(h))
                .cloned()
                .collect();
            self.retired.push(Arc::downgrade(&old));
            retired = Some((old, stale));
        }

        let names: Vec<String> = self.live.keys().cloned().collect();
        for name in names {
            let resolved = self.resolve(&name);
            if let Some(logger) = self.live.get(&name) {
                logger.swap(resolved);
                logger.set_filter(self.filter.clone());
            }
        }

        let held: Vec<Arc<Logger>> = self.retired.iter().filter_map(Weak::upgrade).collect();
        self.retired.retain(|w| w.strong_count() > 0);
        for logger in held {
            logger.swap(self.resolve(logger.channel()));
            logger.set_filter(self.filter.clone());
        }
        retired
    }
}

fn ensure_unique(
    list: &[Arc<dyn Handler>],
    candidate: &Arc<dyn Handler>,
    channel: Option<&str>,
) -> Result<(), Error> {
    if list.iter().any(|h| Arc::ptr_eq(h, candidate)) {
        return Err(Error::DuplicateHandler {
            channel: channel.map(ToString::to_string),
            handler: candidate.name().to_string(),
        });
    }
    Ok(())
}

fn unique_list(list: &[Arc<dyn Handler>], channel: Option<&str>) -> Result<(), Error> {
    for (idx, handler) in list.iter().enumerate() {
        ensure_unique(&list[..idx], handler, channel)?;
    }
    Ok(())
}

/// Owns channel configuration, the resolution cache and the live loggers.
///
/// All bookkeeping sits behind one lock; emitting through a `Logger` never
/// touches it.
#[derive(Default)]
pub struct Router {
    state: Mutex<State>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Router")
            .field("channels", &state.channels.len())
            .field("default_handlers", &state.default_handlers.len())
            .field("default_processors", &state.default_processors.len())
            .field("cached", &state.cache.len())
            .field("live", &state.live.keys().collect::<Vec<_>>())
            .field("retired", &state.retired.len())
            .finish()
    }
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The logger for `name`, created on first use. Repeated calls return the
    /// same instance.
    ///
    /// # Errors
    /// `Error::InvalidChannel` for a malformed name.
    pub fn channel(&self, name: &str) -> Result<Arc<Logger>, Error> {
        validate_channel(name)?;
        let mut state = self.state.lock();
        if let Some(logger) = state.live.get(name) {
            return Ok(Arc::clone(logger));
        }

        let resolved = state.resolve(name);
        let logger = Arc::new(Logger::new(name, resolved));
        logger.set_filter(state.filter.clone());
        state.live.insert(name.to_string(), Arc::clone(&logger));
        internal::debug("ROUTER", &format!("Created logger '{name}'"));
        Ok(logger)
    }

    /// # Errors
    /// `Error::InvalidChannel` for a malformed name.
    pub fn resolve(&self, name: &str) -> Result<Arc<Resolved>, Error> {
        validate_channel(name)?;
        Ok(self.state.lock().resolve(name))
    }

    /// # Errors
    /// `Error::InvalidChannel` for a malformed name.
    pub fn handlers(&self, name: &str) -> Result<Vec<Arc<dyn Handler>>, Error> {
        Ok(self.resolve(name)?.handlers().to_vec())
    }

    /// # Errors
    /// `Error::InvalidChannel` for a malformed name.
    pub fn processors(&self, name: &str) -> Result<Vec<Arc<dyn Processor>>, Error> {
        Ok(self.resolve(name)?.processors().to_vec())
    }

    /// Whether `name` itself (not an ancestor) carries explicit configuration.
    #[must_use]
    pub fn has_channel_config(&self, name: &str) -> bool {
        self.state.lock().channels.contains_key(name)
    }

    /// Names with a live logger, sorted.
    #[must_use]
    pub fn live_channels(&self) -> Vec<String> {
        self.state.lock().live.keys().cloned().collect()
    }

    /// Replaces the handlers of `name`. An empty list is still an explicit entry.
    ///
    /// # Errors
    /// `Error::InvalidChannel` or `Error::DuplicateHandler`.
    pub fn set_channel_handlers(
        &self,
        name: &str,
        handlers: Vec<Arc<dyn Handler>>,
    ) -> Result<(), Error> {
        validate_channel(name)?;
        unique_list(&handlers, Some(name))?;
        self.write(Some(name), |state| {
            state.channels.entry(name.to_string()).or_default().handlers = Some(handlers);
            Ok(())
        })
    }

    /// # Errors
    /// `Error::InvalidChannel` or `Error::DuplicateHandler`.
    pub fn add_channel_handler(&self, name: &str, handler: Arc<dyn Handler>) -> Result<(), Error> {
        validate_channel(name)?;
        self.write(Some(name), |state| {
            if let Some(list) = state.channels.get(name).and_then(|c| c.handlers.as_ref()) {
                ensure_unique(list, &handler, Some(name))?;
            }
            state
                .channels
                .entry(name.to_string())
                .or_default()
                .handlers
                .get_or_insert_with(Vec::new)
                .push(handler);
            Ok(())
        })
    }

    /// # Errors
    /// `Error::InvalidChannel` for a malformed name.
    pub fn set_channel_processors(
        &self,
        name: &str,
        processors: Vec<Arc<dyn Processor>>,
    ) -> Result<(), Error> {
        validate_channel(name)?;
        self.write(None, |state| {
            state.channels.entry(name.to_string()).or_default().processors = processors;
            Ok(())
        })
    }

    /// # Errors
    /// `Error::InvalidChannel` for a malformed name.
    pub fn add_channel_processor(
        &self,
        name: &str,
        processor: Arc<dyn Processor>,
    ) -> Result<(), Error> {
        validate_channel(name)?;
        self.write(None, |state| {
            state
                .channels
                .entry(name.to_string())
                .or_default()
                .processors
                .push(processor);
            Ok(())
        })
    }

    /// Drops every explicit entry for `name`; it inherits again.
    ///
    /// # Errors
    /// `Error::InvalidChannel` for a malformed name.
    pub fn clear_channel(&self, name: &str) -> Result<(), Error> {
        validate_channel(name)?;
        self.write(Some(name), |state| {
            state.channels.remove(name);
            Ok(())
        })
    }

    pub fn set_default_handler(&self, handler: Arc<dyn Handler>) {
        self.write_infallible(|state| state.default_handlers = vec![handler]);
    }

    /// # Errors
    /// `Error::DuplicateHandler` when the list holds one instance twice.
    pub fn set_default_handlers(&self, handlers: Vec<Arc<dyn Handler>>) -> Result<(), Error> {
        unique_list(&handlers, None)?;
        self.write(None, |state| {
            state.default_handlers = handlers;
            Ok(())
        })
    }

    /// # Errors
    /// `Error::DuplicateHandler` when `handler` is already a default.
    pub fn add_default_handler(&self, handler: Arc<dyn Handler>) -> Result<(), Error> {
        self.write(None, |state| {
            ensure_unique(&state.default_handlers, &handler, None)?;
            state.default_handlers.push(handler);
            Ok(())
        })
    }

    pub fn set_default_processors(&self, processors: Vec<Arc<dyn Processor>>) {
        self.write_infallible(|state| state.default_processors = processors);
    }

    pub fn add_default_processor(&self, processor: Arc<dyn Processor>) {
        self.write_infallible(|state| state.default_processors.push(processor));
    }

    /// Installs the emit filter consulted by every logger of this router.
    pub fn set_filter(&self, filter: impl EmitFilter + 'static) {
        let filter: Arc<dyn EmitFilter> = Arc::new(filter);
        self.write_infallible(|state| state.filter = Some(filter));
    }

    /// Back to fail-open: every record is emitted.
    pub fn clear_filter(&self) {
        self.write_infallible(|state| state.filter = None);
    }

    /// Closes every live logger and forgets it. Configuration is kept, so
    /// `channel` hands out fresh loggers afterwards.
    pub fn close(&self) {
        let live = std::mem::take(&mut self.state.lock().live);
        for logger in live.values() {
            logger.close();
        }
        if !live.is_empty() {
            internal::debug("ROUTER", &format!("Closed {} logger(s)", live.len()));
        }
    }

    /// Applies `change` under the lock, invalidates, then retires the handle
    /// that was replaced (if any) after the lock is released.
    fn write(
        &self,
        replaced: Option<&str>,
        change: impl FnOnce(&mut State) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let retired = {
            let mut state = self.state.lock();
            change(&mut state)?;
            state.invalidate(replaced)
        };
        // Only handlers dropped from every entry are closed; the retired
        // handle keeps following the channel's resolution.
        if let Some((old, stale)) = retired {
            old.retire(&stale);
            internal::debug("ROUTER", &format!("Replaced logger '{}'", old.channel()));
        }
        Ok(())
    }

    fn write_infallible(&self, change: impl FnOnce(&mut State)) {
        let mut state = self.state.lock();
        change(&mut state);
        let _ = state.invalidate(None);
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        self.close();
    }
}
