//! JSONL record format read by `chanlog render`.

use crate::Error;
use crate::level::Level;
use crate::record::{Fields, Record, Value};
use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value as Json;

/// One input line.
///
/// `level` is a name (`"warning"`, `"warn"`) or a weight (`300`).
#[derive(Debug, Deserialize)]
pub struct WireRecord {
    pub channel: String,
    pub level: Json,
    pub message: String,
    #[serde(default)]
    pub context: Option<serde_json::Map<String, Json>>,
    #[serde(default)]
    pub extra: Option<serde_json::Map<String, Json>>,
    /// RFC 3339; the current time when absent.
    #[serde(default)]
    pub datetime: Option<String>,
}

impl WireRecord {
    /// # Errors
    /// `InvalidLevel` for an unknown name or weight, `Format` for a bad timestamp.
    pub fn into_record(self) -> Result<Record, Error> {
        let level = match &self.level {
            Json::String(name) => name.parse::<Level>()?,
            Json::Number(n) => n
                .as_u64()
                .and_then(|w| u16::try_from(w).ok())
                .and_then(Level::from_weight)
                .ok_or_else(|| Error::InvalidLevel(n.to_string()))?,
            other => return Err(Error::InvalidLevel(other.to_string())),
        };

        let mut record = Record::new(self.channel, level, self.message)
            .with_context(fields(self.context))
            .with_extra(fields(self.extra));
        if let Some(raw) = self.datetime {
            let parsed = DateTime::parse_from_rfc3339(&raw)
                .map_err(|e| Error::Format(format!("invalid datetime '{raw}': {e}")))?;
            record = record.at(parsed.with_timezone(&Local));
        }
        Ok(record)
    }
}

fn fields(map: Option<serde_json::Map<String, Json>>) -> Fields {
    map.map_or_else(Fields::new, |map| {
        map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    })
}

/// Parses one JSONL line into a record.
///
/// # Errors
/// `Format` for invalid JSON, plus everything [`WireRecord::into_record`] rejects.
pub fn parse_record(line: &str) -> Result<Record, Error> {
    let wire: WireRecord =
        serde_json::from_str(line).map_err(|e| Error::Format(format!("invalid JSON: {e}")))?;
    wire.into_record()
}
