//! Configuration struct definitions.

use crate::render::{DEFAULT_LINE_DATE_FORMAT, DEFAULT_LINE_TEMPLATE};
use serde::Deserialize;
use std::collections::HashMap;

/// General configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Registry name used for lookups without a name.
    pub default_channel: String,
    /// Minimum level of the crate's own diagnostics, or `off`.
    pub diagnostics: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_channel: crate::registry::DEFAULT_NAME.to_string(),
            diagnostics: "off".to_string(),
        }
    }
}

/// `[channels."name"]` emit settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChannelSettings {
    pub enabled: bool,
    /// Minimum level name.
    pub level: String,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
        }
    }
}

/// `[render]`: the default renderer plus one table per renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Renderer used when the caller does not pick one.
    pub format: String,
    pub json: JsonRenderConfig,
    pub line: LineRenderConfig,
    pub compact: CompactRenderConfig,
    pub boxed: BoxedRenderConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: "line".to_string(),
            json: JsonRenderConfig::default(),
            line: LineRenderConfig::default(),
            compact: CompactRenderConfig::default(),
            boxed: BoxedRenderConfig::default(),
        }
    }
}

/// `max_length = 0` means unlimited in every renderer table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JsonRenderConfig {
    /// `json` (one array) or `newlines`.
    pub batch: String,
    pub pretty: bool,
    pub append_newline: bool,
    pub ignore_empty: bool,
    pub include_stacktraces: bool,
    /// Top-level keys to keep; absent keeps all.
    pub include_fields: Option<Vec<String>>,
    pub exclude_fields: Vec<String>,
    pub max_length: usize,
}

impl Default for JsonRenderConfig {
    fn default() -> Self {
        Self {
            batch: "json".to_string(),
            pretty: false,
            append_newline: true,
            ignore_empty: false,
            include_stacktraces: false,
            include_fields: None,
            exclude_fields: Vec::new(),
            max_length: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LineRenderConfig {
    pub template: String,
    pub date_format: String,
    pub allow_inline_line_breaks: bool,
    pub ignore_empty: bool,
    pub include_stacktraces: bool,
    pub max_length: usize,
}

impl Default for LineRenderConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_LINE_TEMPLATE.to_string(),
            date_format: DEFAULT_LINE_DATE_FORMAT.to_string(),
            allow_inline_line_breaks: false,
            ignore_empty: false,
            include_stacktraces: false,
            max_length: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CompactRenderConfig {
    pub date_format: String,
    pub show_timestamp: bool,
    pub show_level: bool,
    pub show_channel: bool,
    pub show_request_id: bool,
    pub show_pid: bool,
    pub show_memory: bool,
    pub include_stacktraces: bool,
    pub max_length: usize,
}

impl Default for CompactRenderConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            show_timestamp: true,
            show_level: true,
            show_channel: true,
            show_request_id: true,
            show_pid: false,
            show_memory: false,
            include_stacktraces: false,
            max_length: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoxedRenderConfig {
    pub width: usize,
    pub colors: bool,
    pub key_padding: usize,
    pub trace_frames: usize,
    pub max_length: usize,
    pub date_format: String,
    /// Level name to hex color, overriding the built-in palette.
    pub level_colors: HashMap<String, String>,
}

impl Default for BoxedRenderConfig {
    fn default() -> Self {
        Self {
            width: 80,
            colors: false,
            key_padding: 20,
            trace_frames: 10,
            max_length: 1000,
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
            level_colors: HashMap::new(),
        }
    }
}
