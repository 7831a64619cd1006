//! Machine-readable encoder: one JSON object per record.
//!
//! The `context` and `extra` members keep the shape the persistence layer
//! stores in its JSON columns. Unicode and `/` are written unescaped.

use super::{Renderer, encode_fallback, encode_json};
use crate::normalize::{FieldFilter, Normalizer, truncate};
use crate::record::{Fields, Record};
use chrono::SecondsFormat;
use serde_json::{Map, Value as Json};

/// How a batch of records is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// A single JSON array.
    #[default]
    Json,
    /// One object per line.
    Newlines,
}

#[derive(Debug, Clone)]
pub struct JsonRenderer {
    normalizer: Normalizer,
    batch_mode: BatchMode,
    append_newline: bool,
    ignore_empty: bool,
    pretty: bool,
    filter: FieldFilter,
    max_length: Option<usize>,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::new(),
            batch_mode: BatchMode::Json,
            append_newline: true,
            ignore_empty: false,
            pretty: false,
            filter: FieldFilter::new(),
            max_length: None,
        }
    }

    #[must_use]
    pub const fn batch_mode(mut self, mode: BatchMode) -> Self {
        self.batch_mode = mode;
        self
    }

    #[must_use]
    pub const fn append_newline(mut self, append: bool) -> Self {
        self.append_newline = append;
        self
    }

    /// Omit `context`/`extra` members when they are empty.
    #[must_use]
    pub const fn ignore_empty_context_and_extra(mut self, ignore: bool) -> Self {
        self.ignore_empty = ignore;
        self
    }

    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub const fn include_stacktraces(mut self, include: bool) -> Self {
        self.normalizer = self.normalizer.include_stacktraces(include);
        self
    }

    #[must_use]
    pub fn field_filter(mut self, filter: FieldFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Serialized length cap for `context` and `extra`. Over-long members become a
    /// string holding the truncated serialization, so the document stays valid JSON.
    #[must_use]
    pub const fn max_length(mut self, max: Option<usize>) -> Self {
        self.max_length = max;
        self
    }

    #[must_use]
    pub const fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The record as a JSON object, after normalization and field filtering.
    #[must_use]
    pub fn to_value(&self, record: &Record) -> Json {
        let mut map = Map::new();
        map.insert(
            "datetime".to_string(),
            Json::String(
                record
                    .datetime()
                    .to_rfc3339_opts(SecondsFormat::Micros, false),
            ),
        );
        map.insert(
            "channel".to_string(),
            Json::String(record.channel().to_string()),
        );
        map.insert(
            "level".to_string(),
            Json::String(record.level().as_str().to_string()),
        );
        map.insert(
            "level_value".to_string(),
            Json::Number(record.level().weight().into()),
        );
        map.insert(
            "message".to_string(),
            Json::String(record.message().to_string()),
        );
        self.insert_fields(&mut map, "context", record.context());
        self.insert_fields(&mut map, "extra", record.extra());

        self.filter.apply(&mut map);
        Json::Object(map)
    }

    fn insert_fields(&self, map: &mut Map<String, Json>, key: &str, fields: &Fields) {
        if self.ignore_empty && fields.is_empty() {
            return;
        }
        let value = Json::Object(self.normalizer.fields(fields));
        map.insert(key.to_string(), self.bounded(value));
    }

    fn bounded(&self, value: Json) -> Json {
        let Some(max) = self.max_length else {
            return value;
        };
        let encoded = encode_json(&value, "map");
        if encoded.chars().count() > max {
            Json::String(truncate(&encoded, max))
        } else {
            value
        }
    }

    fn encode(&self, value: &Json, input_kind: &str) -> String {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.unwrap_or_else(|e| encode_fallback(&e.to_string(), input_kind))
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, record: &Record) -> String {
        let mut out = self.encode(&self.to_value(record), "record");
        if self.append_newline {
            out.push('\n');
        }
        out
    }

    fn render_batch(&self, records: &[Record]) -> String {
        match self.batch_mode {
            BatchMode::Json => {
                let items = records.iter().map(|r| self.to_value(r)).collect();
                let mut out = self.encode(&Json::Array(items), "batch");
                if self.append_newline {
                    out.push('\n');
                }
                out
            }
            BatchMode::Newlines => {
                let lines: Vec<String> = records
                    .iter()
                    .map(|r| self.encode(&self.to_value(r), "record"))
                    .collect();
                let mut out = lines.join("\n");
                if self.append_newline && !out.is_empty() {
                    out.push('\n');
                }
                out
            }
        }
    }
}
