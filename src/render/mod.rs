//! Record renderers: one strategy per output encoding.
//!
//! A renderer's struct holds its configuration; rendering itself is a pure
//! function of the record. None of them panic on well-formed input: if
//! encoding fails they emit a fallback payload describing the failure.

mod boxed;
mod color;
mod compact;
mod json;
mod line;
pub mod template;

pub use boxed::BoxedRenderer;
pub use color::Color;
pub use compact::CompactRenderer;
pub use json::{BatchMode, JsonRenderer};
pub use line::{DEFAULT_LINE_DATE_FORMAT, DEFAULT_LINE_TEMPLATE, LineRenderer};
pub use template::{Placeholder, Segment, Template};

use crate::normalize::{Normalizer, truncate_opt};
use crate::record::{Fields, Record, Value};
use crate::runtime;
use chrono::{DateTime, Local, SecondsFormat};
use serde_json::{Map, Value as Json};
use std::fmt::{self, Write as _};
use std::str::FromStr;

/// Turns one record, or a batch of records, into text.
pub trait Renderer: Send + Sync {
    fn render(&self, record: &Record) -> String;

    /// Default batch form: each record's rendering, concatenated.
    fn render_batch(&self, records: &[Record]) -> String {
        records.iter().map(|r| self.render(r)).collect()
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&self, record: &Record) -> String {
        (**self).render(record)
    }

    fn render_batch(&self, records: &[Record]) -> String {
        (**self).render_batch(records)
    }
}

/// Named renderer choice, as used in config files and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RendererKind {
    Json,
    #[default]
    Line,
    Compact,
    Boxed,
}

impl RendererKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Line => "line",
            Self::Compact => "compact",
            Self::Boxed => "boxed",
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Json, Self::Line, Self::Compact, Self::Boxed]
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RendererKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" | "structured" => Ok(Self::Json),
            "line" => Ok(Self::Line),
            "compact" | "multiline" => Ok(Self::Compact),
            "boxed" | "pretty" => Ok(Self::Boxed),
            other => Err(crate::Error::Format(format!("unknown renderer: {other}"))),
        }
    }
}

/// Payload emitted when a value cannot be encoded.
#[must_use]
pub fn encode_fallback(reason: &str, input_kind: &str) -> String {
    let mut map = Map::new();
    map.insert("encode_error".to_string(), Json::String(reason.to_string()));
    map.insert("input_kind".to_string(), Json::String(input_kind.to_string()));
    serde_json::to_string(&Json::Object(map)).unwrap_or_else(|_| {
        String::from(r#"{"encode_error":"unencodable","input_kind":"unknown"}"#)
    })
}

/// Compact JSON with the fallback payload on failure.
pub(crate) fn encode_json(value: &Json, input_kind: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| encode_fallback(&e.to_string(), input_kind))
}

/// Normalized map as JSON text, truncated at `max`.
pub(crate) fn fields_json(
    normalizer: &Normalizer,
    fields: &Fields,
    max: Option<usize>,
) -> String {
    let json = encode_json(&Json::Object(normalizer.fields(fields)), "map");
    truncate_opt(json, max)
}

/// Normalized map as space-separated `key=value` pairs, truncated at `max`.
pub(crate) fn fields_kv(normalizer: &Normalizer, fields: &Fields, max: Option<usize>) -> String {
    let pairs: Vec<String> = normalizer
        .fields(fields)
        .iter()
        .map(|(k, v)| format!("{k}={}", kv_value(v)))
        .collect();
    truncate_opt(pairs.join(" "), max)
}

/// Bare strings stay bare unless they would be ambiguous in a `k=v` list.
fn kv_value(value: &Json) -> String {
    match value {
        Json::String(s)
            if !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || c == '"' || c == '=') =>
        {
            s.clone()
        }
        other => encode_json(other, "value"),
    }
}

/// Formats a timestamp without panicking on an invalid strftime string;
/// falls back to RFC 3339.
pub(crate) fn format_datetime(datetime: &DateTime<Local>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", datetime.format(format)).is_err() {
        return datetime.to_rfc3339_opts(SecondsFormat::Micros, false);
    }
    out
}

/// Memory label: `extra.memory_usage` when a processor recorded it, else the live RSS.
pub(crate) fn memory_label(record: &Record) -> Option<String> {
    match record.extra().get("memory_usage") {
        Some(Value::Int(bytes)) => u64::try_from(*bytes).ok().map(runtime::format_bytes),
        Some(Value::String(s)) => Some(s.clone()),
        _ => runtime::resident_memory().map(runtime::format_bytes),
    }
}
