//! `%placeholder%` templates for the single-line renderer.
//!
//! The template is parsed once into segments and then run by a tiny
//! interpreter. Substitution is not plain string replacement: when a
//! placeholder renders empty, the separator next to it is removed too, so no
//! dangling delimiter is left behind.

/// Closed set of substitution tokens. Unknown `%names%` stay literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Datetime,
    Channel,
    LevelName,
    Level,
    Message,
    Context,
    ContextKv,
    Extra,
    ExtraKv,
    Pid,
    Memory,
}

impl Placeholder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Datetime => "datetime",
            Self::Channel => "channel",
            Self::LevelName => "level_name",
            Self::Level => "level",
            Self::Message => "message",
            Self::Context => "context",
            Self::ContextKv => "context_kv",
            Self::Extra => "extra",
            Self::ExtraKv => "extra_kv",
            Self::Pid => "pid",
            Self::Memory => "memory",
        }
    }

    pub const ALL: &'static [Self] = &[
        Self::Datetime,
        Self::Channel,
        Self::LevelName,
        Self::Level,
        Self::Message,
        Self::Context,
        Self::ContextKv,
        Self::Extra,
        Self::ExtraKv,
        Self::Pid,
        Self::Memory,
    ];

    fn lookup(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ph| ph.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Pre-parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `%name%` tokens. A `%` that does not open a known placeholder is literal.
    #[must_use]
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(start) = rest.find('%') {
            literal.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            let known = after
                .find('%')
                .and_then(|end| Placeholder::lookup(&after[..end]).map(|ph| (ph, end)));

            match known {
                Some((ph, end)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(ph));
                    rest = &after[end + 1..];
                }
                None => {
                    literal.push('%');
                    rest = after;
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True if the template references `ph` anywhere.
    #[must_use]
    pub fn uses(&self, ph: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(p) if *p == ph))
    }

    /// Substitutes each placeholder with `value(ph)`.
    ///
    /// An empty value removes the adjacent whitespace run (trailing whitespace of
    /// the text before it, or else leading whitespace of the literal after it).
    /// If the placeholder is the only content of a `[]`, `()` or `{}` pair, the
    /// pair goes too.
    pub fn render(&self, mut value: impl FnMut(Placeholder) -> String) -> String {
        let mut out = String::new();
        let mut skip_closer = false;
        let mut trim_leading = false;

        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => {
                    let mut text = text.as_str();
                    if skip_closer {
                        text = &text[1..];
                    }
                    if trim_leading {
                        text = text.trim_start_matches([' ', '\t']);
                    }
                    skip_closer = false;
                    trim_leading = false;
                    out.push_str(text);
                }
                Segment::Placeholder(ph) => {
                    let rendered = value(*ph);
                    if !rendered.is_empty() {
                        skip_closer = false;
                        trim_leading = false;
                        out.push_str(&rendered);
                        continue;
                    }

                    let next = match self.segments.get(idx + 1) {
                        Some(Segment::Literal(text)) => Some(text.as_str()),
                        _ => None,
                    };
                    if let Some(close) = out.chars().next_back().and_then(closer)
                        && next.is_some_and(|n| n.starts_with(close))
                    {
                        out.pop();
                        skip_closer = true;
                    }

                    let kept = out.trim_end_matches([' ', '\t']).len();
                    if kept < out.len() {
                        out.truncate(kept);
                    } else {
                        trim_leading = true;
                    }
                }
            }
        }

        out
    }
}

const fn closer(open: char) -> Option<char> {
    match open {
        '[' => Some(']'),
        '(' => Some(')'),
        '{' => Some('}'),
        _ => None,
    }
}
