//! 24-bit ANSI colors for severity highlighting in the boxed renderer.

use crate::level::Level;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB`. Malformed input falls back to white so a config typo
    /// never breaks rendering.
    #[must_use]
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Self::white();
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        Self { r, g, b }
    }

    #[must_use]
    pub fn fg_ansi(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";

    /// Default palette, one color per severity.
    #[must_use]
    pub const fn for_level(level: Level) -> Self {
        match level {
            Level::Debug => Self::new(98, 114, 164),
            Level::Info => Self::new(139, 233, 253),
            Level::Notice => Self::new(80, 250, 123),
            Level::Warning => Self::new(241, 250, 140),
            Level::Error => Self::new(255, 85, 85),
            Level::Critical => Self::new(255, 121, 198),
            Level::Alert => Self::new(255, 184, 108),
            Level::Emergency => Self::new(189, 147, 249),
        }
    }

    #[must_use]
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
