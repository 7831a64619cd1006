//! The log record and the structured data it carries.

mod exception;
mod value;

pub use exception::{Exception, Frame};
pub use value::{Fields, Object, SelfDescribing, Value};

use crate::level::Level;
use chrono::{DateTime, Local};

/// One log event.
///
/// Processors receive records by value and return the transformed record;
/// handlers only ever see a shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    channel: String,
    level: Level,
    message: String,
    context: Fields,
    extra: Fields,
    datetime: DateTime<Local>,
}

impl Record {
    /// New record stamped with the current local time.
    #[must_use]
    pub fn new(channel: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            level,
            message: message.into(),
            context: Fields::new(),
            extra: Fields::new(),
            datetime: Local::now(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Fields) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_extra(mut self, extra: Fields) -> Self {
        self.extra = extra;
        self
    }

    /// Overrides the timestamp, mostly for deterministic rendering in tests.
    #[must_use]
    pub fn at(mut self, datetime: DateTime<Local>) -> Self {
        self.datetime = datetime;
        self
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn context(&self) -> &Fields {
        &self.context
    }

    #[must_use]
    pub const fn extra(&self) -> &Fields {
        &self.extra
    }

    #[must_use]
    pub const fn datetime(&self) -> DateTime<Local> {
        self.datetime
    }

    pub const fn context_mut(&mut self) -> &mut Fields {
        &mut self.context
    }

    pub const fn extra_mut(&mut self) -> &mut Fields {
        &mut self.extra
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// The exception carried in the context: the `exception` key first, then the first
    /// top-level exception value.
    #[must_use]
    pub fn exception(&self) -> Option<(&str, &Exception)> {
        if let Some(exc) = self.context.get("exception").and_then(Value::as_exception) {
            return Some(("exception", exc));
        }
        self.context
            .iter()
            .find_map(|(k, v)| v.as_exception().map(|e| (k, e)))
    }

    /// Request id from `extra.request_id`, falling back to the context.
    #[must_use]
    pub fn request_id(&self) -> Option<String> {
        self.extra
            .get("request_id")
            .or_else(|| self.context.get("request_id"))
            .and_then(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Int(i) => Some(i.to_string()),
                _ => None,
            })
    }
}
