//! Named directory of loggers for code that cannot be handed one explicitly.
//!
//! Tests build independent `Registry` instances; `Registry::global()` is the
//! process-wide one.

use crate::internal;
use crate::logger::Logger;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Name looked up when no default has been designated.
pub const DEFAULT_NAME: &str = "default";

static GLOBAL: OnceLock<Registry> = OnceLock::new();

#[derive(Debug, Default)]
struct Directory {
    loggers: HashMap<String, Arc<Logger>>,
    default: Option<String>,
}

#[derive(Debug)]
pub struct Registry {
    directory: RwLock<Directory>,
    fallback: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::with_fallback(DEFAULT_NAME)
    }

    /// Registry whose lookup of an absent name, before any default is set,
    /// goes to `fallback` instead of `"default"`.
    #[must_use]
    pub fn with_fallback(fallback: impl Into<String>) -> Self {
        Self {
            directory: RwLock::new(Directory::default()),
            fallback: fallback.into(),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Stores `logger` under `name`, or under its channel when `name` is
    /// `None`. The name becomes the default when none exists yet or when
    /// `set_as_default` is set. Returns the name used.
    pub fn register(&self, logger: Arc<Logger>, name: Option<&str>, set_as_default: bool) -> String {
        let name = name.unwrap_or_else(|| logger.channel()).to_string();
        let mut directory = self.directory.write();
        directory.loggers.insert(name.clone(), logger);
        if set_as_default || directory.default.is_none() {
            directory.default = Some(name.clone());
        }
        internal::trace("REGISTRY", &format!("Registered '{name}'"));
        name
    }

    /// Looks up `name`, or the default when `name` is `None`.
    #[must_use]
    pub fn get(&self, name: Option<&str>) -> Option<Arc<Logger>> {
        let directory = self.directory.read();
        let key = match name {
            Some(name) => name,
            None => directory.default.as_deref().unwrap_or(&self.fallback),
        };
        directory.loggers.get(key).cloned()
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.directory.read().loggers.contains_key(name)
    }

    /// Removes `name`. The default pointer is left alone, so removing the
    /// default makes absent-name lookups miss until something is registered
    /// under that name again.
    pub fn remove(&self, name: &str) -> Option<Arc<Logger>> {
        self.directory.write().loggers.remove(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.directory.read().loggers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name an absent-name lookup resolves to.
    #[must_use]
    pub fn default_name(&self) -> String {
        self.directory
            .read()
            .default
            .clone()
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Forgets every entry and the default.
    pub fn clear(&self) {
        let mut directory = self.directory.write();
        directory.loggers.clear();
        directory.default = None;
    }
}
