//! Record processors: steps that enrich a record before any handler sees it.
//!
//! Processors run in resolution order (defaults first, then each configured
//! ancestor channel) and own the record while they run.

use crate::record::{Record, Value};
use crate::runtime;
use ulid::Ulid;

pub trait Processor: Send + Sync {
    fn process(&self, record: Record) -> Record;
}

impl<F> Processor for F
where
    F: Fn(Record) -> Record + Send + Sync,
{
    fn process(&self, record: Record) -> Record {
        self(record)
    }
}

/// Adds `extra.request_id`, fixed for the lifetime of the processor.
#[derive(Debug, Clone)]
pub struct RequestIdProcessor {
    id: String,
}

impl Default for RequestIdProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestIdProcessor {
    /// Fresh ULID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Ulid::new().to_string(),
        }
    }

    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Processor for RequestIdProcessor {
    fn process(&self, mut record: Record) -> Record {
        record
            .extra_mut()
            .insert("request_id", self.id.as_str());
        record
    }
}

/// Adds `extra.pid`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessIdProcessor;

impl Processor for ProcessIdProcessor {
    fn process(&self, mut record: Record) -> Record {
        record.extra_mut().insert("pid", runtime::pid());
        record
    }
}

/// Adds `extra.memory_usage` in bytes when the platform reports it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryUsageProcessor;

impl Processor for MemoryUsageProcessor {
    fn process(&self, mut record: Record) -> Record {
        if let Some(bytes) = runtime::resident_memory() {
            record.extra_mut().insert("memory_usage", bytes);
        }
        record
    }
}

/// Appends static tags to `extra.tags`.
#[derive(Debug, Clone, Default)]
pub struct TagProcessor {
    tags: Vec<String>,
}

impl TagProcessor {
    #[must_use]
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

impl Processor for TagProcessor {
    fn process(&self, mut record: Record) -> Record {
        let mut tags = match record.extra_mut().remove("tags") {
            Some(Value::List(existing)) => existing,
            Some(other) => vec![other],
            None => Vec::new(),
        };
        tags.extend(self.tags.iter().map(|t| Value::from(t.as_str())));
        record.extra_mut().insert("tags", Value::List(tags));
        record
    }
}
