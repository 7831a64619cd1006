//! Turns context/extra maps and exception chains into bounded `serde_json` trees.
//!
//! Every renderer goes through the [`Normalizer`], so the depth and size caps
//! apply uniformly no matter which encoding is produced. Normalization is total:
//! any [`Value`] maps to some JSON value and recursion is always capped.

mod sanitize;

pub use sanitize::{ELLIPSIS, collapse_newlines, sanitize, truncate, truncate_opt};

use crate::record::{Exception, Fields, Value};
use serde_json::{Map, Number, Value as Json};

/// Exception chains deeper than this end in a `[max depth reached]` node.
pub const MAX_EXCEPTION_DEPTH: usize = 10;

/// Serialized traces keep at most this many frames.
pub const MAX_TRACE_FRAMES: usize = 20;

/// Terminal trace entry when frames were dropped.
pub const TRACE_TRUNCATED: &str = "... (truncated)";

/// Message of the node that replaces an exception past [`MAX_EXCEPTION_DEPTH`].
pub const MAX_DEPTH_MESSAGE: &str = "[max depth reached]";

/// Shared normalization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    max_depth: usize,
    max_items: usize,
    include_stacktraces: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: 9,
            max_items: 1000,
            include_stacktraces: false,
        }
    }

    /// Nesting depth for maps and lists before aborting.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Items per map or list before the rest is replaced with a `...` summary.
    #[must_use]
    pub const fn max_items(mut self, items: usize) -> Self {
        self.max_items = items;
        self
    }

    #[must_use]
    pub const fn include_stacktraces(mut self, include: bool) -> Self {
        self.include_stacktraces = include;
        self
    }

    #[must_use]
    pub const fn stacktraces(&self) -> bool {
        self.include_stacktraces
    }

    /// Normalizes a top-level map into a JSON object.
    #[must_use]
    pub fn fields(&self, fields: &Fields) -> Map<String, Json> {
        let mut out = Map::new();
        for (count, (key, value)) in fields.iter().enumerate() {
            if count >= self.max_items {
                out.insert("...".to_string(), self.over_items(fields.len()));
                break;
            }
            out.insert(key.to_string(), self.value_at(value, 1));
        }
        out
    }

    /// Normalizes one value.
    #[must_use]
    pub fn value(&self, value: &Value) -> Json {
        self.value_at(value, 0)
    }

    fn value_at(&self, value: &Value, depth: usize) -> Json {
        if depth > self.max_depth {
            return Json::String(format!(
                "Over {} levels deep, aborting normalization",
                self.max_depth
            ));
        }

        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::Number((*i).into()),
            Value::Float(x) => float(*x),
            Value::String(s) => Json::String(s.clone()),
            Value::Map(map) => {
                let mut out = Map::new();
                for (count, (key, item)) in map.iter().enumerate() {
                    if count >= self.max_items {
                        out.insert("...".to_string(), self.over_items(map.len()));
                        break;
                    }
                    out.insert(key.to_string(), self.value_at(item, depth + 1));
                }
                Json::Object(out)
            }
            Value::List(items) => {
                let mut out = Vec::with_capacity(items.len().min(self.max_items + 1));
                for (count, item) in items.iter().enumerate() {
                    if count >= self.max_items {
                        out.push(self.over_items(items.len()));
                        break;
                    }
                    out.push(self.value_at(item, depth + 1));
                }
                Json::Array(out)
            }
            Value::Exception(exc) => self.exception(exc),
            Value::Object(object) => object.self_describing().map_or_else(
                || Json::String(format!("[{}]", object.type_name())),
                |described| self.value_at(&described.describe(), depth + 1),
            ),
        }
    }

    fn over_items(&self, total: usize) -> Json {
        Json::String(format!(
            "Over {} items ({total} total), aborting normalization",
            self.max_items
        ))
    }

    /// Serializes an exception chain, capped at [`MAX_EXCEPTION_DEPTH`].
    #[must_use]
    pub fn exception(&self, exc: &Exception) -> Json {
        self.exception_at(exc, 0)
    }

    fn exception_at(&self, exc: &Exception, depth: usize) -> Json {
        let mut out = Map::new();
        out.insert("class".to_string(), Json::String(exc.class.clone()));

        if depth >= MAX_EXCEPTION_DEPTH {
            out.insert(
                "message".to_string(),
                Json::String(MAX_DEPTH_MESSAGE.to_string()),
            );
            return Json::Object(out);
        }

        out.insert("message".to_string(), Json::String(exc.message.clone()));
        out.insert("code".to_string(), Json::Number(exc.code.into()));
        out.insert("file".to_string(), Json::String(exc.location()));

        if self.include_stacktraces {
            out.insert(
                "trace".to_string(),
                Json::Array(trace_lines(exc).into_iter().map(Json::String).collect()),
            );
        }

        if let Some(previous) = &exc.previous {
            out.insert(
                "previous".to_string(),
                self.exception_at(previous, depth + 1),
            );
        }

        Json::Object(out)
    }
}

/// `file:line callsite()` strings, capped at [`MAX_TRACE_FRAMES`] plus a truncation marker.
#[must_use]
pub fn trace_lines(exc: &Exception) -> Vec<String> {
    let mut lines: Vec<String> = exc
        .frames
        .iter()
        .take(MAX_TRACE_FRAMES)
        .map(ToString::to_string)
        .collect();
    if exc.frames.len() > MAX_TRACE_FRAMES {
        lines.push(TRACE_TRUNCATED.to_string());
    }
    lines
}

/// JSON has no representation for NaN or infinities.
fn float(x: f64) -> Json {
    if x.is_nan() {
        Json::String("NaN".to_string())
    } else if x.is_infinite() {
        Json::String(if x > 0.0 { "INF" } else { "-INF" }.to_string())
    } else {
        Number::from_f64(x).map_or(Json::Null, Json::Number)
    }
}

/// Top-level include/exclude lists applied after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilter {
    include: Option<Vec<String>>,
    exclude: Vec<String>,
}

impl FieldFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only these keys. An empty list keeps nothing.
    #[must_use]
    pub fn include<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn exclude<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.include.is_none() && self.exclude.is_empty()
    }

    /// Removes top-level keys; nested content is never inspected.
    pub fn apply(&self, map: &mut Map<String, Json>) {
        if let Some(include) = &self.include {
            map.retain(|k, _| include.iter().any(|i| i == k));
        }
        if !self.exclude.is_empty() {
            map.retain(|k, _| !self.exclude.iter().any(|e| e == k));
        }
    }
}
