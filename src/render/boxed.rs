//! Boxed human-readable encoder for terminals and incident reports.
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │ 2025-01-15 14:30:00  ERROR  app.http             │
//! ├──────────────────────────────────────────────────┤
//! │ MESSAGE                                          │
//! │   boom                                           │
//! ├──────────────────────────────────────────────────┤
//! │ CONTEXT                                          │
//! │   host                 = db1                     │
//! └──────────────────────────────────────────────────┘
//! ```

use super::{Color, Renderer, encode_json, format_datetime};
use crate::level::Level;
use crate::normalize::{
    MAX_EXCEPTION_DEPTH, Normalizer, collapse_newlines, sanitize, truncate, truncate_opt,
};
use crate::record::{Exception, Fields, Record};
use serde_json::Value as Json;
use std::collections::HashMap;

const MIN_WIDTH: usize = 40;
const MAX_WIDTH: usize = 500;
const MIN_KEY_PADDING: usize = 10;
const MAX_KEY_PADDING: usize = 40;
const MAX_INLINE_CHARS: usize = 120;
const MAX_INLINE_ITEMS: usize = 5;

/// Row styling, resolved to ANSI only when colors are enabled.
#[derive(Clone, Copy)]
enum Style {
    Plain,
    Title,
    Level(Level),
}

#[derive(Debug, Clone)]
pub struct BoxedRenderer {
    normalizer: Normalizer,
    width: usize,
    colors: bool,
    key_padding: usize,
    trace_frames: usize,
    max_length: Option<usize>,
    date_format: String,
    level_colors: HashMap<Level, Color>,
}

impl Default for BoxedRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxedRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::new(),
            width: 80,
            colors: false,
            key_padding: 20,
            trace_frames: 10,
            max_length: Some(1000),
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
            level_colors: HashMap::new(),
        }
    }

    /// Total block width including borders, clamped to `[40, 500]`.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        self
    }

    #[must_use]
    pub const fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    /// Key column width, clamped to `[10, 40]`.
    #[must_use]
    pub fn key_padding(mut self, padding: usize) -> Self {
        self.key_padding = padding.clamp(MIN_KEY_PADDING, MAX_KEY_PADDING);
        self
    }

    /// Frames shown per exception before the `... and N more frames` summary.
    #[must_use]
    pub const fn trace_frames(mut self, frames: usize) -> Self {
        self.trace_frames = frames;
        self
    }

    #[must_use]
    pub const fn max_length(mut self, max: Option<usize>) -> Self {
        self.max_length = max;
        self
    }

    #[must_use]
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Overrides the palette color for one severity.
    #[must_use]
    pub fn level_color(mut self, level: Level, color: Color) -> Self {
        self.level_colors.insert(level, color);
        self
    }

    #[must_use]
    pub const fn get_key_padding(&self) -> usize {
        self.key_padding
    }

    const fn inner_width(&self) -> usize {
        self.width - 4
    }

    fn border(&self, left: char, right: char) -> String {
        format!("{left}{}{right}", "─".repeat(self.width - 2))
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if !self.colors {
            return text.to_string();
        }
        match style {
            Style::Plain => text.to_string(),
            Style::Title => format!("{}{text}{}", Color::BOLD, Color::RESET),
            Style::Level(level) => {
                let color = self
                    .level_colors
                    .get(&level)
                    .copied()
                    .unwrap_or_else(|| Color::for_level(level));
                format!("{}{}{text}{}", Color::BOLD, color.fg_ansi(), Color::RESET)
            }
        }
    }

    /// Wraps `text` to the inner width and frames each piece. `indent` is applied to
    /// continuation lines only and never exceeds half the inner width.
    fn rows(&self, text: &str, indent: usize, style: Style, out: &mut Vec<String>) {
        let inner = self.inner_width();
        let indent = indent.min(inner / 2);
        for (idx, piece) in wrap(text, inner, indent).into_iter().enumerate() {
            let prefix = if idx == 0 { 0 } else { indent };
            let visible = prefix + piece.chars().count();
            let pad = inner.saturating_sub(visible);
            out.push(format!(
                "│ {}{}{} │",
                " ".repeat(prefix),
                self.paint(&piece, style),
                " ".repeat(pad)
            ));
        }
    }

    fn header(&self, record: &Record, out: &mut Vec<String>) {
        let time = format_datetime(&record.datetime(), &self.date_format);
        let level = record.level().name();
        let channel = collapse_newlines(&sanitize(record.channel()));
        let inner = self.inner_width();

        let plain = format!("{time}  {level}  {channel}");
        if plain.chars().count() > inner || !self.colors {
            self.rows(&plain, 2, Style::Plain, out);
            return;
        }

        // Pad before painting so escape codes do not count toward the width.
        let pad = inner - plain.chars().count();
        out.push(format!(
            "│ {time}  {}  {channel}{} │",
            self.paint(level, Style::Level(record.level())),
            " ".repeat(pad)
        ));
    }

    fn fields_section(&self, title: &str, fields: &Fields, skip: Option<&str>) -> Vec<String> {
        let mut map = self.normalizer.fields(fields);
        if let Some(skip) = skip {
            map.retain(|k, _| k != skip);
        }
        if map.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::new();
        self.rows(title, 0, Style::Title, &mut out);
        for (key, value) in &map {
            let key = collapse_newlines(&sanitize(key));
            let line = format!(
                "  {key:<width$} = {}",
                self.display_value(value),
                width = self.key_padding
            );
            self.rows(&line, self.key_padding + 5, Style::Plain, &mut out);
        }
        out
    }

    /// Inline form of a normalized value, eliding anything large.
    fn display_value(&self, value: &Json) -> String {
        let shown = match value {
            Json::String(s) => {
                let s = collapse_newlines(&sanitize(s));
                let count = s.chars().count();
                if count > MAX_INLINE_CHARS {
                    let head: String = s.chars().take(MAX_INLINE_CHARS).collect();
                    format!("{head}... [{count} chars]")
                } else {
                    s
                }
            }
            Json::Array(items) if items.len() > MAX_INLINE_ITEMS => {
                format!("[{} items]", items.len())
            }
            Json::Object(map) if map.len() > MAX_INLINE_ITEMS => format!("{{{} keys}}", map.len()),
            other => collapse_newlines(&sanitize(&encode_json(other, "value"))),
        };
        truncate_opt(shown, self.max_length)
    }

    fn exception_section(&self, exc: &Exception) -> Vec<String> {
        let mut out = Vec::new();
        self.rows("EXCEPTION", 0, Style::Title, &mut out);

        for (depth, current) in exc.chain().enumerate() {
            if depth >= MAX_EXCEPTION_DEPTH {
                self.rows(
                    &format!("  Caused by: {} [max depth reached]", current.class),
                    4,
                    Style::Plain,
                    &mut out,
                );
                break;
            }

            let lead = if depth == 0 { "" } else { "Caused by: " };
            let message = collapse_newlines(&sanitize(&current.message));
            self.rows(
                &format!("  {lead}{}: {message}", current.class),
                4,
                Style::Plain,
                &mut out,
            );
            if !current.file.is_empty() {
                self.rows(&format!("    at {}", current.location()), 6, Style::Plain, &mut out);
            }
            if current.code != 0 {
                self.rows(&format!("    code {}", current.code), 6, Style::Plain, &mut out);
            }
            self.trace_rows(current, &mut out);
        }
        out
    }

    fn trace_rows(&self, exc: &Exception, out: &mut Vec<String>) {
        if self.trace_frames == 0 || exc.frames.is_empty() {
            return;
        }
        for (idx, frame) in exc.frames.iter().take(self.trace_frames).enumerate() {
            let frame = truncate(&sanitize(&frame.to_string()), self.inner_width());
            self.rows(&format!("    #{idx} {frame}"), 8, Style::Plain, out);
        }
        let hidden = exc.frames.len().saturating_sub(self.trace_frames);
        if hidden > 0 {
            self.rows(
                &format!("    ... and {hidden} more frames"),
                8,
                Style::Plain,
                out,
            );
        }
    }
}

impl Renderer for BoxedRenderer {
    fn render(&self, record: &Record) -> String {
        let mut lines = vec![self.border('┌', '┐')];
        self.header(record, &mut lines);

        let mut sections = Vec::new();

        let mut message = Vec::new();
        self.rows("MESSAGE", 0, Style::Title, &mut message);
        for line in sanitize(record.message()).lines() {
            self.rows(&format!("  {line}"), 2, Style::Plain, &mut message);
        }
        sections.push(message);

        let exception = record.exception();
        sections.push(self.fields_section(
            "CONTEXT",
            record.context(),
            exception.map(|(k, _)| k),
        ));
        sections.push(self.fields_section("EXTRA", record.extra(), None));
        if let Some((_, exc)) = exception {
            sections.push(self.exception_section(exc));
        }

        for section in sections.into_iter().filter(|s| !s.is_empty()) {
            lines.push(self.border('├', '┤'));
            lines.extend(section);
        }

        lines.push(self.border('└', '┘'));
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn render_batch(&self, records: &[Record]) -> String {
        records.iter().map(|r| self.render(r)).collect()
    }
}

/// Greedy word wrap. The first piece gets `width` columns, continuation pieces
/// `width - indent`. Leading spaces of the first piece are kept and words longer
/// than a line are split hard.
fn wrap(text: &str, width: usize, indent: usize) -> Vec<String> {
    let body = text.trim_start_matches(' ');
    let lead = (text.len() - body.len()).min(width.saturating_sub(1));
    let mut pieces = Vec::new();
    let mut current = " ".repeat(lead);
    let mut current_len = lead;
    let mut joined = false;
    let limit = |pieces: &Vec<String>| {
        if pieces.is_empty() {
            width
        } else {
            width.saturating_sub(indent).max(1)
        }
    };

    for word in body.split(' ') {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let room = limit(&pieces);
            let sep = usize::from(joined);
            if current_len + sep + word.len() <= room {
                if joined {
                    current.push(' ');
                }
                current.extend(word.iter());
                current_len += sep + word.len();
                joined = true;
                break;
            }
            joined = false;
            if current_len > 0 {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            let rest = word.split_off(room.min(word.len()));
            pieces.push(word.into_iter().collect());
            word = rest;
            if word.is_empty() {
                break;
            }
        }
    }

    if current_len > 0 || pieces.is_empty() {
        pieces.push(current);
    }
    pieces
}
