//! Persistence adapter: records flattened into the fixed log table row.
//!
//! The column set and index list are a contract shared with whatever
//! provisions the store; `JsonlRowSink` is the file-backed implementation.

use super::Handler;
use super::file::{expand_path, open_append};
use crate::Error;
use crate::level::Level;
use crate::normalize::Normalizer;
use crate::record::{Fields, Record, Value};
use chrono::SecondsFormat;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value as Json;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use ulid::Ulid;

/// One row of the log table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRow {
    /// ULID, time-sortable.
    pub id: String,
    pub channel: String,
    /// Lower-case level name.
    pub level: String,
    pub level_value: u16,
    pub message: String,
    /// Normalized context as JSON text.
    pub context: String,
    /// Normalized extra as JSON text.
    pub extra: String,
    /// RFC 3339 with microseconds.
    pub created_at: String,
    pub request_id: Option<String>,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl LogRow {
    pub const COLUMNS: [&'static str; 12] = [
        "id",
        "channel",
        "level",
        "level_value",
        "message",
        "context",
        "extra",
        "created_at",
        "request_id",
        "user_id",
        "ip_address",
        "user_agent",
    ];

    /// Indexes the table is expected to carry, one column list per index.
    pub const INDEXES: &'static [&'static [&'static str]] = &[
        &["channel"],
        &["level_value"],
        &["created_at"],
        &["request_id"],
        &["channel", "created_at"],
    ];

    #[must_use]
    pub fn from_record(record: &Record, normalizer: &Normalizer) -> Self {
        Self {
            id: Ulid::new().to_string(),
            channel: record.channel().to_string(),
            level: record.level().as_str().to_string(),
            level_value: record.level().weight(),
            message: record.message().to_string(),
            context: json_column(normalizer, record.context()),
            extra: json_column(normalizer, record.extra()),
            created_at: record
                .datetime()
                .to_rfc3339_opts(SecondsFormat::Micros, false),
            request_id: record.request_id(),
            user_id: lookup(record, "user_id"),
            ip_address: lookup(record, "ip_address"),
            user_agent: lookup(record, "user_agent"),
        }
    }
}

fn json_column(normalizer: &Normalizer, fields: &Fields) -> String {
    serde_json::to_string(&Json::Object(normalizer.fields(fields)))
        .unwrap_or_else(|e| crate::render::encode_fallback(&e.to_string(), "map"))
}

/// Scalar column value from extra, falling back to context.
fn lookup(record: &Record, key: &str) -> Option<String> {
    let value = record
        .extra()
        .get(key)
        .or_else(|| record.context().get(key))?;
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Int(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Row storage backend.
pub trait RowSink: Send + Sync {
    /// # Errors
    /// Storage failures.
    fn insert(&self, row: &LogRow) -> Result<(), Error>;

    /// # Errors
    /// The first storage failure.
    fn insert_many(&self, rows: &[LogRow]) -> Result<(), Error> {
        rows.iter().try_for_each(|row| self.insert(row))
    }

    /// # Errors
    /// Storage failures.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }

    /// # Errors
    /// Storage failures.
    fn close(&self) -> Result<(), Error> {
        self.flush()
    }
}

/// In-memory sink.
impl RowSink for Mutex<Vec<LogRow>> {
    fn insert(&self, row: &LogRow) -> Result<(), Error> {
        self.lock().push(row.clone());
        Ok(())
    }
}

/// Appends rows as JSON lines. Opens lazily and releases the file on `close`.
#[derive(Debug)]
pub struct JsonlRowSink {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl JsonlRowSink {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: expand_path(path.as_ref()),
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, text: &str) -> Result<(), Error> {
        let mut slot = self.file.lock();
        if slot.is_none() {
            *slot = Some(open_append(&self.path, "ROWS")?);
        }
        if let Some(file) = slot.as_mut() {
            file.write_all(text.as_bytes())?;
        }
        Ok(())
    }
}

fn encode_row(row: &LogRow) -> Result<String, Error> {
    serde_json::to_string(row)
        .map_err(|e| Error::Format(format!("row serialization failed: {e}")))
}

impl RowSink for JsonlRowSink {
    fn insert(&self, row: &LogRow) -> Result<(), Error> {
        let mut line = encode_row(row)?;
        line.push('\n');
        self.append(&line)
    }

    fn insert_many(&self, rows: &[LogRow]) -> Result<(), Error> {
        let mut text = String::new();
        for row in rows {
            text.push_str(&encode_row(row)?);
            text.push('\n');
        }
        if text.is_empty() {
            return Ok(());
        }
        self.append(&text)
    }

    fn flush(&self) -> Result<(), Error> {
        if let Some(file) = self.file.lock().as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        if let Some(mut file) = self.file.lock().take() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Maps records into `LogRow`s and hands them to a sink.
pub struct RowHandler<S: RowSink> {
    name: String,
    sink: S,
    normalizer: Normalizer,
    min_level: Level,
}

impl<S: RowSink> RowHandler<S> {
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            name: "row".to_string(),
            sink,
            normalizer: Normalizer::new(),
            min_level: Level::Debug,
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub const fn level(mut self, min_level: Level) -> Self {
        self.min_level = min_level;
        self
    }

    /// Include exception traces in the context column.
    #[must_use]
    pub const fn include_stacktraces(mut self, include: bool) -> Self {
        self.normalizer = self.normalizer.include_stacktraces(include);
        self
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Tags a sink failure with this handler's name. I/O errors pass through.
    fn attribute(&self, err: Error) -> Error {
        match err {
            Error::Io(_) => err,
            other => Error::Handler {
                handler: self.name.clone(),
                reason: other.to_string(),
            },
        }
    }
}

impl<S: RowSink> Handler for RowHandler<S> {
    fn handle(&self, record: &Record) -> Result<(), Error> {
        self.sink
            .insert(&LogRow::from_record(record, &self.normalizer))
            .map_err(|e| self.attribute(e))
    }

    fn handle_batch(&self, records: &[Record]) -> Result<(), Error> {
        let rows: Vec<LogRow> = records
            .iter()
            .filter(|r| self.is_handling(r.level()))
            .map(|r| LogRow::from_record(r, &self.normalizer))
            .collect();
        self.sink.insert_many(&rows).map_err(|e| self.attribute(e))
    }

    fn is_handling(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn flush(&self) -> Result<(), Error> {
        self.sink.flush()
    }

    fn close(&self) -> Result<(), Error> {
        self.sink.close()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
