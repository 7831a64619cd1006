//! chanlog's own diagnostic channel: handler failures, cache invalidations,
//! file opens.
//!
//! Uses `OnceLock` so the sink is initialized exactly once, even if several
//! entry points race to call `init`. Calls made before init are dropped.
//! The sink writes straight to stderr with a `LineRenderer` and never goes
//! through a `Logger`, so a failing handler cannot recurse into itself.

use crate::config::Config;
use crate::level::Level;
use crate::record::Record;
use crate::render::{LineRenderer, Renderer};
use std::io::{self, Write};
use std::sync::OnceLock;

/// Weight of the trace pseudo-level, below `Level::Debug`.
const TRACE: u16 = 0;

static DIAGNOSTICS: OnceLock<Diagnostics> = OnceLock::new();

struct Diagnostics {
    threshold: u16,
    renderer: LineRenderer,
}

impl Diagnostics {
    fn new(threshold: u16) -> Self {
        Self {
            threshold,
            renderer: LineRenderer::new()
                .template("[%datetime%] %channel%.%level_name%: %message%")
                .date_format("%H:%M:%S%.3f"),
        }
    }

    fn emit(&self, weight: u16, level: Level, scope: &str, msg: &str) {
        if weight < self.threshold {
            return;
        }
        let record = Record::new("chanlog", level, format!("[{scope}] {msg}"));
        let line = self.renderer.render(&record);
        let _ = io::stderr().lock().write_all(line.as_bytes());
    }
}

/// Enables diagnostics at `level` and above. Only the first init takes effect.
pub fn init(level: Level) {
    install(level.weight());
}

/// Enables everything, including trace output.
pub fn init_trace() {
    install(TRACE);
}

/// Initializes from `general.diagnostics`; does nothing when it is `off`.
pub fn init_with_config(config: &Config) {
    if config.general.diagnostics.trim().eq_ignore_ascii_case("trace") {
        init_trace();
    } else if let Some(level) = config.diagnostics_level() {
        init(level);
    }
}

fn install(threshold: u16) {
    let was_init = DIAGNOSTICS.get().is_some();
    DIAGNOSTICS.get_or_init(|| Diagnostics::new(threshold));
    if !was_init {
        debug("INTERNAL", "Diagnostics ready");
    }
}

fn log(weight: u16, level: Level, scope: &str, msg: &str) {
    if let Some(diagnostics) = DIAGNOSTICS.get() {
        diagnostics.emit(weight, level, scope, msg);
    }
}

/// High-volume instrumentation; rendered as debug output.
pub fn trace(scope: &str, msg: &str) {
    log(TRACE, Level::Debug, scope, msg);
}

pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug.weight(), Level::Debug, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Info.weight(), Level::Info, scope, msg);
}

/// Non-fatal anomalies, such as a handler failing on one record.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warning.weight(), Level::Warning, scope, msg);
}

pub fn error(scope: &str, msg: &str) {
    log(Level::Error.weight(), Level::Error, scope, msg);
}
