//! Display-safety helpers for strings that end up in terminals or single-line logs.

use regex::Regex;
use std::sync::LazyLock;

/// CSI sequences (`ESC [ … final`), OSC sequences terminated by BEL or ST, and two-byte escapes.
static ANSI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[[0-?]*[ -/]*[@-~]|\][^\x07\x1b]*(?:\x07|\x1b\\)|[@-Z\\-_])")
        .expect("Invalid ANSI regex")
});

/// Marker appended to anything cut short.
pub const ELLIPSIS: &str = "...";

/// Strips ANSI escapes, C0 controls other than tab and newline, and DEL.
///
/// Carriage returns are dropped; renderers decide what a newline becomes.
#[must_use]
pub fn sanitize(s: &str) -> String {
    let stripped = if s.contains('\x1b') {
        ANSI_REGEX.replace_all(s, "")
    } else {
        std::borrow::Cow::Borrowed(s)
    };

    stripped
        .chars()
        .filter(|&c| c == '\t' || c == '\n' || !(c.is_ascii_control()))
        .collect()
}

/// Replaces every newline with a single space.
#[must_use]
pub fn collapse_newlines(s: &str) -> String {
    if !s.contains(['\n', '\r']) {
        return s.to_string();
    }
    s.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Cuts `s` to at most `max` characters and appends [`ELLIPSIS`] when anything was removed.
#[must_use]
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}{ELLIPSIS}", &s[..idx]),
        None => s.to_string(),
    }
}

/// [`truncate`] with an optional limit.
#[must_use]
pub fn truncate_opt(s: String, max: Option<usize>) -> String {
    match max {
        Some(max) => truncate(&s, max),
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_csi_and_osc() {
        assert_eq!(sanitize("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(sanitize("\x1b]0;title\x07text"), "text");
    }

    #[test]
    fn keeps_tab_and_newline() {
        assert_eq!(sanitize("a\tb\nc\rd\x00e\x7f"), "a\tb\ncde");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 5), "héllo...");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exact", 5), "exact");
    }
}
