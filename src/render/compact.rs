//! Dense multi-line encoder: a bracketed header followed by a small tree.
//!
//! ```text
//! [2025-01-15 14:30:00.123] [ERROR] [app.http] [req:01J...] [pid:4242]
//! ├─ boom
//! ├─ context: {"host":"db1"}
//! └─ exception: RuntimeError(42): connection refused at src/db.rs:17
//! ```

use super::{Renderer, encode_json, format_datetime, memory_label};
use crate::normalize::{
    MAX_EXCEPTION_DEPTH, Normalizer, TRACE_TRUNCATED, collapse_newlines, sanitize, trace_lines,
    truncate_opt,
};
use crate::record::{Exception, Fields, Record};
use crate::runtime;
use serde_json::Value as Json;

const CONNECTOR: &str = "├─ ";
const TERMINATOR: &str = "└─ ";
const CONTINUATION: &str = "│    ";
const TAIL_CONTINUATION: &str = "     ";

/// One tree entry plus the indented lines hanging off it.
struct Entry {
    text: String,
    children: Vec<String>,
}

impl Entry {
    const fn new(text: String) -> Self {
        Self {
            text,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CompactRenderer {
    normalizer: Normalizer,
    date_format: String,
    show_timestamp: bool,
    show_level: bool,
    show_channel: bool,
    show_request_id: bool,
    show_pid: bool,
    show_memory: bool,
    max_length: Option<usize>,
}

impl Default for CompactRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CompactRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::new(),
            date_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            show_timestamp: true,
            show_level: true,
            show_channel: true,
            show_request_id: true,
            show_pid: false,
            show_memory: false,
            max_length: Some(1000),
        }
    }

    #[must_use]
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    #[must_use]
    pub const fn show_timestamp(mut self, show: bool) -> Self {
        self.show_timestamp = show;
        self
    }

    #[must_use]
    pub const fn show_level(mut self, show: bool) -> Self {
        self.show_level = show;
        self
    }

    #[must_use]
    pub const fn show_channel(mut self, show: bool) -> Self {
        self.show_channel = show;
        self
    }

    /// Only shown when the record actually carries a request id.
    #[must_use]
    pub const fn show_request_id(mut self, show: bool) -> Self {
        self.show_request_id = show;
        self
    }

    #[must_use]
    pub const fn show_pid(mut self, show: bool) -> Self {
        self.show_pid = show;
        self
    }

    #[must_use]
    pub const fn show_memory(mut self, show: bool) -> Self {
        self.show_memory = show;
        self
    }

    #[must_use]
    pub const fn include_stacktraces(mut self, include: bool) -> Self {
        self.normalizer = self.normalizer.include_stacktraces(include);
        self
    }

    #[must_use]
    pub const fn max_length(mut self, max: Option<usize>) -> Self {
        self.max_length = max;
        self
    }

    fn header(&self, record: &Record) -> String {
        let mut parts = Vec::new();
        if self.show_timestamp {
            parts.push(format!(
                "[{}]",
                format_datetime(&record.datetime(), &self.date_format)
            ));
        }
        if self.show_level {
            parts.push(format!("[{}]", record.level().name()));
        }
        if self.show_channel {
            parts.push(format!("[{}]", collapse_newlines(&sanitize(record.channel()))));
        }
        if self.show_request_id
            && let Some(id) = record.request_id()
        {
            parts.push(format!("[req:{}]", collapse_newlines(&sanitize(&id))));
        }
        if self.show_pid {
            parts.push(format!("[pid:{}]", runtime::pid()));
        }
        if self.show_memory
            && let Some(mem) = memory_label(record)
        {
            parts.push(format!("[mem:{mem}]"));
        }
        parts.join(" ")
    }

    fn fields_line(&self, label: &str, fields: &Fields, skip: Option<&str>) -> Option<Entry> {
        let mut map = self.normalizer.fields(fields);
        if let Some(skip) = skip {
            map.retain(|k, _| k != skip);
        }
        if map.is_empty() {
            return None;
        }
        let json = truncate_opt(encode_json(&Json::Object(map), "map"), self.max_length);
        Some(Entry::new(format!("{label}: {json}")))
    }

    fn exception_entry(&self, exc: &Exception) -> Entry {
        let mut entry = Entry::new(format!("exception: {}", summary(exc)));
        if !self.normalizer.stacktraces() {
            return entry;
        }

        entry.children.extend(trace_lines(exc).into_iter().map(|l| {
            if l == TRACE_TRUNCATED {
                l
            } else {
                format!("at {l}")
            }
        }));
        for (depth, cause) in exc.chain().enumerate().skip(1) {
            if depth >= MAX_EXCEPTION_DEPTH {
                entry
                    .children
                    .push(format!("caused by: {} [max depth reached]", cause.class));
                break;
            }
            entry.children.push(format!("caused by: {}", summary(cause)));
        }
        entry
    }
}

fn summary(exc: &Exception) -> String {
    collapse_newlines(&sanitize(&exc.to_string()))
}

impl Renderer for CompactRenderer {
    fn render(&self, record: &Record) -> String {
        let mut lines = Vec::new();
        let header = self.header(record);
        if !header.is_empty() {
            lines.push(header);
        }

        let exception = record.exception();
        let mut entries = vec![Entry::new(collapse_newlines(&sanitize(record.message())))];
        entries.extend(self.fields_line("context", record.context(), exception.map(|(k, _)| k)));
        entries.extend(self.fields_line("extra", record.extra(), None));
        if let Some((_, exc)) = exception {
            entries.push(self.exception_entry(exc));
        }

        let last = entries.len() - 1;
        for (idx, entry) in entries.into_iter().enumerate() {
            let (glyph, indent) = if idx == last {
                (TERMINATOR, TAIL_CONTINUATION)
            } else {
                (CONNECTOR, CONTINUATION)
            };
            lines.push(format!("{glyph}{}", entry.text));
            lines.extend(entry.children.into_iter().map(|c| format!("{indent}{c}")));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Blocks are separated by a blank line.
    fn render_batch(&self, records: &[Record]) -> String {
        records
            .iter()
            .map(|r| self.render(r))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
