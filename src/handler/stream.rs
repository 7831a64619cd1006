//! Standard stream output: the zero-configuration way to see records.

use super::Handler;
use crate::Error;
use crate::level::Level;
use crate::record::Record;
use crate::render::{LineRenderer, Renderer};
use std::io::{self, Write};

/// Where a `StreamHandler` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamTarget {
    Stdout,
    Stderr,
    /// Records at or above the level go to stderr, the rest to stdout.
    Split(Level),
}

impl Default for StreamTarget {
    fn default() -> Self {
        Self::Split(Level::Warning)
    }
}

pub struct StreamHandler {
    name: String,
    target: StreamTarget,
    renderer: Box<dyn Renderer>,
    min_level: Level,
}

impl Default for StreamHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StreamHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandler")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

impl StreamHandler {
    /// Line renderer, warnings and above on stderr.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "stream".to_string(),
            target: StreamTarget::default(),
            renderer: Box::new(LineRenderer::new()),
            min_level: Level::Debug,
        }
    }

    #[must_use]
    pub fn stdout() -> Self {
        Self::new().target(StreamTarget::Stdout)
    }

    #[must_use]
    pub fn stderr() -> Self {
        Self::new().target(StreamTarget::Stderr)
    }

    #[must_use]
    pub const fn target(mut self, target: StreamTarget) -> Self {
        self.target = target;
        self
    }

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

    /// Same as [`renderer`](Self::renderer) for an already boxed renderer,
    /// as produced by `RenderConfig::build`.
    #[must_use]
    pub fn boxed_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub const fn level(mut self, min_level: Level) -> Self {
        self.min_level = min_level;
        self
    }

    const fn to_stderr(&self, level: Level) -> bool {
        match self.target {
            StreamTarget::Stdout => false,
            StreamTarget::Stderr => true,
            StreamTarget::Split(threshold) => level.weight() >= threshold.weight(),
        }
    }
}

impl Handler for StreamHandler {
    fn handle(&self, record: &Record) -> Result<(), Error> {
        let rendered = self.renderer.render(record);
        if self.to_stderr(record.level()) {
            io::stderr().lock().write_all(rendered.as_bytes())?;
        } else {
            io::stdout().lock().write_all(rendered.as_bytes())?;
        }
        Ok(())
    }

    fn is_handling(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn flush(&self) -> Result<(), Error> {
        io::stdout().flush()?;
        io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
