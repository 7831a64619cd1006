//! Dense single-line encoder driven by a `%placeholder%` template.

use super::template::{Placeholder, Template};
use super::{Renderer, fields_json, fields_kv, format_datetime, memory_label};
use crate::normalize::{Normalizer, collapse_newlines, sanitize};
use crate::record::{Fields, Record};
use crate::runtime;

/// Template used when none is configured.
pub const DEFAULT_LINE_TEMPLATE: &str =
    "[%datetime%] %channel%.%level_name%: %message% %context% %extra%";

/// Default `%datetime%` format (chrono strftime).
pub const DEFAULT_LINE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

#[derive(Debug, Clone)]
pub struct LineRenderer {
    template: Template,
    date_format: String,
    normalizer: Normalizer,
    allow_inline_line_breaks: bool,
    ignore_empty: bool,
    max_length: Option<usize>,
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            template: Template::parse(DEFAULT_LINE_TEMPLATE),
            date_format: DEFAULT_LINE_DATE_FORMAT.to_string(),
            normalizer: Normalizer::new(),
            allow_inline_line_breaks: false,
            ignore_empty: false,
            max_length: Some(1000),
        }
    }

    /// Replaces the template. A trailing newline in the template is optional:
    /// output always ends with exactly one.
    #[must_use]
    pub fn template(mut self, template: &str) -> Self {
        self.template = Template::parse(template);
        self
    }

    #[must_use]
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    #[must_use]
    pub const fn allow_inline_line_breaks(mut self, allow: bool) -> Self {
        self.allow_inline_line_breaks = allow;
        self
    }

    /// Render empty context/extra as nothing instead of `{}`.
    #[must_use]
    pub const fn ignore_empty_context_and_extra(mut self, ignore: bool) -> Self {
        self.ignore_empty = ignore;
        self
    }

    #[must_use]
    pub const fn include_stacktraces(mut self, include: bool) -> Self {
        self.normalizer = self.normalizer.include_stacktraces(include);
        self
    }

    /// Cap for `%context%`, `%extra%` and their `_kv` forms.
    #[must_use]
    pub const fn max_length(mut self, max: Option<usize>) -> Self {
        self.max_length = max;
        self
    }

    fn json(&self, fields: &Fields) -> String {
        if fields.is_empty() {
            return if self.ignore_empty {
                String::new()
            } else {
                "{}".to_string()
            };
        }
        fields_json(&self.normalizer, fields, self.max_length)
    }

    fn kv(&self, fields: &Fields) -> String {
        fields_kv(&self.normalizer, fields, self.max_length)
    }

    fn value(&self, record: &Record, ph: Placeholder) -> String {
        match ph {
            Placeholder::Datetime => format_datetime(&record.datetime(), &self.date_format),
            Placeholder::Channel => sanitize(record.channel()),
            Placeholder::LevelName => record.level().name().to_string(),
            Placeholder::Level => record.level().weight().to_string(),
            Placeholder::Message => sanitize(record.message()),
            Placeholder::Context => self.json(record.context()),
            Placeholder::ContextKv => self.kv(record.context()),
            Placeholder::Extra => self.json(record.extra()),
            Placeholder::ExtraKv => self.kv(record.extra()),
            Placeholder::Pid => runtime::pid().to_string(),
            Placeholder::Memory => memory_label(record).unwrap_or_default(),
        }
    }
}

impl Renderer for LineRenderer {
    fn render(&self, record: &Record) -> String {
        let rendered = self.template.render(|ph| self.value(record, ph));
        let body = rendered.trim_end_matches(['\n', '\r']);
        let mut line = if self.allow_inline_line_breaks {
            body.to_string()
        } else {
            collapse_newlines(body)
        };
        line.push('\n');
        line
    }
}
