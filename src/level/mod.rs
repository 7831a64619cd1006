//! Severity levels with fixed integer weights used for threshold comparisons.

use std::fmt;
use std::str::FromStr;

/// Eight ordered severities. `Ord` follows the weight, so `level >= Level::Warning`
/// is a threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u16)]
pub enum Level {
    /// Detailed debug information.
    Debug = 100,
    /// Interesting events: user logs in, SQL logs.
    #[default]
    Info = 200,
    /// Normal but significant events.
    Notice = 250,
    /// Exceptional occurrences that are not errors.
    Warning = 300,
    /// Runtime errors that do not require immediate action.
    Error = 400,
    /// Critical conditions: component unavailable, unexpected failure.
    Critical = 500,
    /// Action must be taken immediately.
    Alert = 550,
    /// The system is unusable.
    Emergency = 600,
}

impl Level {
    /// Numeric weight, stable across releases.
    #[must_use]
    pub const fn weight(self) -> u16 {
        self as u16
    }

    /// Inverse of [`Level::weight`]. Only the eight exact weights map to a level.
    #[must_use]
    pub const fn from_weight(weight: u16) -> Option<Self> {
        match weight {
            100 => Some(Self::Debug),
            200 => Some(Self::Info),
            250 => Some(Self::Notice),
            300 => Some(Self::Warning),
            400 => Some(Self::Error),
            500 => Some(Self::Critical),
            550 => Some(Self::Alert),
            600 => Some(Self::Emergency),
            _ => None,
        }
    }

    /// Lowercase name, used by config files and the structured renderer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
            Self::Alert => "alert",
            Self::Emergency => "emergency",
        }
    }

    /// Uppercase name, used by the text renderers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Notice => "NOTICE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::Alert => "ALERT",
            Self::Emergency => "EMERGENCY",
        }
    }

    /// All levels in ascending order.
    #[must_use]
    pub const fn all() -> [Self; 8] {
        [
            Self::Debug,
            Self::Info,
            Self::Notice,
            Self::Warning,
            Self::Error,
            Self::Critical,
            Self::Alert,
            Self::Emergency,
        ]
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `FromStr` and `TryFrom<u16>` for names or weights outside the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl From<ParseLevelError> for crate::Error {
    fn from(e: ParseLevelError) -> Self {
        Self::InvalidLevel(e.0)
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "notice" => Ok(Self::Notice),
            "warning" | "warn" => Ok(Self::Warning),
            "error" | "err" => Ok(Self::Error),
            "critical" | "crit" => Ok(Self::Critical),
            "alert" => Ok(Self::Alert),
            "emergency" | "emerg" => Ok(Self::Emergency),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl TryFrom<u16> for Level {
    type Error = ParseLevelError;

    fn try_from(weight: u16) -> Result<Self, ParseLevelError> {
        Self::from_weight(weight).ok_or_else(|| ParseLevelError(weight.to_string()))
    }
}

impl From<Level> for u16 {
    fn from(level: Level) -> Self {
        level.weight()
    }
}
