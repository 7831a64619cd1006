//! Exception chains attached to a record's context.

use std::fmt;
use std::sync::Arc;

/// One stack frame. Every part is optional because host runtimes rarely know all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub class: Option<String>,
    pub function: Option<String>,
}

impl Frame {
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
            class: None,
            function: None,
        }
    }

    #[must_use]
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// `Class::function` or just `function`; empty when neither is known.
    #[must_use]
    pub fn callsite(&self) -> String {
        match (&self.class, &self.function) {
            (Some(class), Some(function)) => format!("{class}::{function}"),
            (None, Some(function)) => function.clone(),
            (Some(class), None) => class.clone(),
            (None, None) => String::new(),
        }
    }
}

impl fmt::Display for Frame {
    /// `file:line callsite()`, with `[internal]` standing in for a missing location.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}")?,
            (Some(file), None) => f.write_str(file)?,
            _ => f.write_str("[internal]")?,
        }
        let callsite = self.callsite();
        if !callsite.is_empty() {
            write!(f, " {callsite}()")?;
        }
        Ok(())
    }
}

/// A raised error plus the chain of errors that caused it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exception {
    pub class: String,
    pub message: String,
    pub code: i64,
    pub file: String,
    pub line: u32,
    pub frames: Vec<Frame>,
    pub previous: Option<Arc<Exception>>,
}

impl Exception {
    #[must_use]
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    /// Source location where the exception was raised.
    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    #[must_use]
    pub fn frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    #[must_use]
    pub fn frames(mut self, frames: impl IntoIterator<Item = Frame>) -> Self {
        self.frames.extend(frames);
        self
    }

    #[must_use]
    pub fn caused_by(mut self, previous: impl Into<Arc<Self>>) -> Self {
        self.previous = Some(previous.into());
        self
    }

    /// Builds a chain from a Rust error by walking `source()`.
    ///
    /// The top entry takes the concrete type name; sources are only known as trait objects.
    #[must_use]
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let mut messages = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            messages.push(cause.to_string());
            source = cause.source();
        }

        let previous = messages.into_iter().rev().fold(None, |prev, message| {
            let mut exc = Self::new("Error", message);
            exc.previous = prev;
            Some(Arc::new(exc))
        });

        let full = std::any::type_name::<E>();
        let base = full.split('<').next().unwrap_or(full);
        let class = base.rsplit("::").next().unwrap_or(base);
        Self {
            class: class.to_string(),
            message: err.to_string(),
            previous,
            ..Self::default()
        }
    }

    /// `file:line`, or just the file when no line is known.
    #[must_use]
    pub fn location(&self) -> String {
        if self.line == 0 {
            self.file.clone()
        } else {
            format!("{}:{}", self.file, self.line)
        }
    }

    /// Iterates this exception followed by its causes.
    pub fn chain(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |e| e.previous.as_deref())
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class)?;
        if self.code != 0 {
            write!(f, "({})", self.code)?;
        }
        write!(f, ": {}", self.message)?;
        if !self.file.is_empty() {
            write!(f, " at {}", self.location())?;
        }
        Ok(())
    }
}
