//! In-memory handler for tests and for embedders that post-process records.

use super::Handler;
use crate::Error;
use crate::level::Level;
use crate::record::Record;
use crate::render::{LineRenderer, Renderer};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct Collected {
    records: Vec<Record>,
    rendered: Vec<String>,
}

/// Keeps every record it receives alongside its rendering.
pub struct CollectorHandler {
    name: String,
    renderer: Box<dyn Renderer>,
    min_level: Level,
    collected: Mutex<Collected>,
    closes: AtomicUsize,
}

impl Default for CollectorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CollectorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorHandler")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("records", &self.len())
            .field("closes", &self.close_count())
            .finish_non_exhaustive()
    }
}

impl CollectorHandler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "collector".to_string(),
            renderer: Box::new(LineRenderer::new()),
            min_level: Level::Debug,
            collected: Mutex::new(Collected::default()),
            closes: AtomicUsize::new(0),
        }
    }

    /// Distinguishes several collectors in diagnostics and errors.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    #[must_use]
    pub const fn level(mut self, min_level: Level) -> Self {
        self.min_level = min_level;
        self
    }

    /// Snapshot of the received records, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.collected.lock().records.clone()
    }

    /// Snapshot of the rendered output, one entry per record.
    #[must_use]
    pub fn rendered(&self) -> Vec<String> {
        self.collected.lock().rendered.clone()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.collected
            .lock()
            .records
            .iter()
            .map(|r| r.message().to_string())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.collected.lock().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times `close` has been called.
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        let mut collected = self.collected.lock();
        collected.records.clear();
        collected.rendered.clear();
    }
}

impl Handler for CollectorHandler {
    fn handle(&self, record: &Record) -> Result<(), Error> {
        let rendered = self.renderer.render(record);
        let mut collected = self.collected.lock();
        collected.records.push(record.clone());
        collected.rendered.push(rendered);
        Ok(())
    }

    fn is_handling(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn close(&self) -> Result<(), Error> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
