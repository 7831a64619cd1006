//! TOML configuration: loading, and turning sections into renderers and filters.
//!
//! Struct definitions live in `structs`; this module holds file I/O and the
//! conversions into runtime types.

mod structs;

pub use structs::{
    BoxedRenderConfig, ChannelSettings, CompactRenderConfig, GeneralConfig, JsonRenderConfig,
    LineRenderConfig, RenderConfig,
};

use crate::filter::{ChannelFilter, ChannelSetting};
use crate::internal;
use crate::level::Level;
use crate::normalize::FieldFilter;
use crate::registry::Registry;
use crate::render::{
    BatchMode, BoxedRenderer, Color, CompactRenderer, JsonRenderer, LineRenderer, Renderer,
    RendererKind,
};
use crate::router::validate_channel;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// An empty file is a valid configuration: every section defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    /// Emit settings keyed by channel name.
    pub channels: BTreeMap<String, ChannelSettings>,
    pub render: RenderConfig,
}

impl Config {
    /// Loads the file at [`default_path`](Self::default_path). A missing file
    /// yields the defaults.
    ///
    /// # Errors
    /// Fails if the config directory can't be determined, the file can't be
    /// read, or TOML parsing hits a syntax error.
    pub fn load() -> Result<Self, crate::Error> {
        internal::debug("CONFIG", "Loading config from default location");
        let path = Self::default_path()?;
        let config = Self::load_from(&path)?;
        internal::info("CONFIG", &format!("Config loaded from {}", path.display()));
        Ok(config)
    }

    /// Loads an explicit path; `~` is expanded. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        let raw = path.to_string_lossy();
        let path = PathBuf::from(shellexpand::tilde(&raw).as_ref());
        if !path.exists() {
            internal::debug("CONFIG", "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// # Errors
    /// TOML syntax or type errors.
    pub fn parse(content: &str) -> Result<Self, crate::Error> {
        Ok(toml::from_str(content)?)
    }

    /// `chanlog/chanlog.toml` under the platform config directory.
    ///
    /// # Errors
    /// Fails when the platform has no config directory.
    pub fn default_path() -> Result<PathBuf, crate::Error> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("chanlog").join("chanlog.toml"))
            .ok_or(crate::Error::ConfigDirNotFound)
    }

    /// Level of the crate's own diagnostics; `None` when they are off.
    #[must_use]
    pub fn diagnostics_level(&self) -> Option<Level> {
        match self.general.diagnostics.trim().to_lowercase().as_str() {
            "" | "off" | "none" => None,
            "trace" => Some(Level::Debug),
            other => other.parse().ok(),
        }
    }

    /// Emit filter built from the `[channels]` tables.
    ///
    /// # Errors
    /// `InvalidChannel` or `InvalidLevel` for a malformed entry.
    pub fn filter(&self) -> Result<ChannelFilter, crate::Error> {
        let mut filter = ChannelFilter::new();
        for (name, settings) in &self.channels {
            validate_channel(name)?;
            let min_level: Level = settings.level.parse()?;
            filter = filter.channel(
                name.as_str(),
                ChannelSetting {
                    enabled: settings.enabled,
                    min_level,
                },
            );
        }
        Ok(filter)
    }

    /// Registry whose absent-name fallback is `general.default_channel`.
    #[must_use]
    pub fn registry(&self) -> Registry {
        Registry::with_fallback(self.general.default_channel.as_str())
    }
}

/// `0` disables a length cap.
const fn limit(max_length: usize) -> Option<usize> {
    if max_length == 0 { None } else { Some(max_length) }
}

impl RenderConfig {
    /// The renderer named by `format`.
    ///
    /// # Errors
    /// `Format` for an unknown renderer name.
    pub fn default_kind(&self) -> Result<RendererKind, crate::Error> {
        self.format.parse()
    }

    /// A renderer of `kind` configured from its table.
    #[must_use]
    pub fn build(&self, kind: RendererKind) -> Box<dyn Renderer> {
        match kind {
            RendererKind::Json => Box::new(self.json_renderer()),
            RendererKind::Line => Box::new(self.line_renderer()),
            RendererKind::Compact => Box::new(self.compact_renderer()),
            RendererKind::Boxed => Box::new(self.boxed_renderer()),
        }
    }

    #[must_use]
    pub fn json_renderer(&self) -> JsonRenderer {
        let cfg = &self.json;
        let batch = if cfg.batch.eq_ignore_ascii_case("newlines") {
            BatchMode::Newlines
        } else {
            BatchMode::Json
        };
        let mut filter = FieldFilter::new().exclude(cfg.exclude_fields.iter().cloned());
        if let Some(include) = &cfg.include_fields {
            filter = filter.include(include.iter().cloned());
        }

        JsonRenderer::new()
            .batch_mode(batch)
            .pretty(cfg.pretty)
            .append_newline(cfg.append_newline)
            .ignore_empty_context_and_extra(cfg.ignore_empty)
            .include_stacktraces(cfg.include_stacktraces)
            .field_filter(filter)
            .max_length(limit(cfg.max_length))
    }

    #[must_use]
    pub fn line_renderer(&self) -> LineRenderer {
        let cfg = &self.line;
        LineRenderer::new()
            .template(&cfg.template)
            .date_format(cfg.date_format.as_str())
            .allow_inline_line_breaks(cfg.allow_inline_line_breaks)
            .ignore_empty_context_and_extra(cfg.ignore_empty)
            .include_stacktraces(cfg.include_stacktraces)
            .max_length(limit(cfg.max_length))
    }

    #[must_use]
    pub fn compact_renderer(&self) -> CompactRenderer {
        let cfg = &self.compact;
        CompactRenderer::new()
            .date_format(cfg.date_format.as_str())
            .show_timestamp(cfg.show_timestamp)
            .show_level(cfg.show_level)
            .show_channel(cfg.show_channel)
            .show_request_id(cfg.show_request_id)
            .show_pid(cfg.show_pid)
            .show_memory(cfg.show_memory)
            .include_stacktraces(cfg.include_stacktraces)
            .max_length(limit(cfg.max_length))
    }

    #[must_use]
    pub fn boxed_renderer(&self) -> BoxedRenderer {
        let cfg = &self.boxed;
        let mut renderer = BoxedRenderer::new()
            .width(cfg.width)
            .colors(cfg.colors)
            .key_padding(cfg.key_padding)
            .trace_frames(cfg.trace_frames)
            .max_length(limit(cfg.max_length))
            .date_format(cfg.date_format.as_str());
        for (name, hex) in &cfg.level_colors {
            match name.parse::<Level>() {
                Ok(level) => renderer = renderer.level_color(level, Color::from_hex(hex)),
                Err(e) => internal::warn("CONFIG", &format!("Ignoring level color: {e}")),
            }
        }
        renderer
    }
}
