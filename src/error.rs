//! Unified error type for all chanlog operations.

/// Error type for chanlog operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error from a handler sink or config file.
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
    /// Channel name is empty, has an empty segment, or contains whitespace/control characters.
    InvalidChannel(String),
    /// Severity name or numeric weight that maps to no level.
    InvalidLevel(String),
    /// The same handler instance was attached twice to one list.
    DuplicateHandler {
        /// Channel the list belongs to, `None` for the defaults.
        channel: Option<String>,
        /// Handler name as reported by `Handler::name`.
        handler: String,
    },
    /// Format/serialization error.
    Format(String),
    /// A handler rejected the record for a reason other than I/O.
    Handler {
        /// Handler name as reported by `Handler::name`.
        handler: String,
        /// Reason for the failure.
        reason: String,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::ConfigDirNotFound => write!(f, "config directory not found"),
            Self::InvalidChannel(name) => write!(f, "invalid channel name: '{name}'"),
            Self::InvalidLevel(level) => write!(f, "invalid log level: {level}"),
            Self::DuplicateHandler { channel, handler } => match channel {
                Some(channel) => write!(
                    f,
                    "handler '{handler}' is already attached to channel '{channel}'"
                ),
                None => write!(f, "handler '{handler}' is already a default handler"),
            },
            Self::Format(s) => write!(f, "format error: {s}"),
            Self::Handler { handler, reason } => write!(f, "handler '{handler}' failed: {reason}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}
