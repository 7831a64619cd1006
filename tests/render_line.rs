//! Tests for the single-line template renderer.

use chanlog::render::{DEFAULT_LINE_TEMPLATE, Placeholder, Template};
use chanlog::{Exception, Fields, Level, LineRenderer, Record, Renderer};
use chrono::{Local, TimeZone};

fn at() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap()
}

#[test]
fn default_template() {
    let record = Record::new("app.http", Level::Warning, "slow")
        .with_context(Fields::new().with("ms", 1250))
        .at(at());
    let out = LineRenderer::new()
        .date_format("%Y-%m-%d %H:%M:%S")
        .render(&record);

    assert_eq!(
        out,
        "[2025-01-15 14:30:00] app.http.WARNING: slow {\"ms\":1250} {}\n"
    );
    assert!(DEFAULT_LINE_TEMPLATE.contains("%context%"));
}

#[test]
fn empty_context_leaves_no_dangling_separator() {
    let record = Record::new("app", Level::Info, "msg").at(at());
    let out = LineRenderer::new()
        .template("[%datetime%] %channel%.%level_name%: %message% %context%")
        .date_format("%H:%M:%S")
        .ignore_empty_context_and_extra(true)
        .render(&record);

    assert_eq!(out, "[14:30:00] app.INFO: msg\n");
    assert!(!out.contains("%context%"));
}

#[test]
fn empty_bracketed_placeholder_is_removed_with_brackets() {
    let record = Record::new("app", Level::Info, "msg");
    let out = LineRenderer::new()
        .template("%level_name% [%extra%] %message%")
        .ignore_empty_context_and_extra(true)
        .render(&record);

    assert_eq!(out, "INFO msg\n");
}

#[test]
fn newlines_are_collapsed_by_default() {
    let record = Record::new("app", Level::Info, "first\nsecond\r\nthird");
    let renderer = LineRenderer::new().template("%message%");

    assert_eq!(renderer.render(&record), "first second third\n");

    let out = renderer.allow_inline_line_breaks(true).render(&record);
    assert_eq!(out, "first\nsecond\nthird\n");
}

#[test]
fn output_ends_with_exactly_one_newline() {
    let record = Record::new("app", Level::Info, "msg");
    let out = LineRenderer::new().template("%message%\n").render(&record);
    assert_eq!(out, "msg\n");
}

#[test]
fn control_characters_are_sanitized() {
    let record = Record::new("app", Level::Info, "\x1b[31mred\x1b[0m\x07 text");
    let out = LineRenderer::new().template("%message%").render(&record);
    assert_eq!(out, "red text\n");
}

#[test]
fn key_value_placeholders() {
    let record = Record::new("app", Level::Info, "msg").with_context(
        Fields::new()
            .with("user", "ada")
            .with("note", "two words")
            .with("n", 3),
    );
    let out = LineRenderer::new().template("%context_kv%").render(&record);
    assert_eq!(out, "user=ada note=\"two words\" n=3\n");
}

#[test]
fn level_weight_and_pid() {
    let record = Record::new("app", Level::Notice, "msg");
    let out = LineRenderer::new().template("%level% %pid%").render(&record);
    assert_eq!(out, format!("250 {}\n", std::process::id()));
}

#[test]
fn max_length_caps_context() {
    let record = Record::new("app", Level::Info, "msg")
        .with_context(Fields::new().with("blob", "y".repeat(100)));
    let out = LineRenderer::new()
        .template("%context%")
        .max_length(Some(10))
        .render(&record);
    assert_eq!(out, "{\"blob\":\"y...\n");
}

#[test]
fn exceptions_are_normalized_inline() {
    let record = Record::new("app", Level::Error, "failed")
        .with_context(Fields::new().with("exception", Exception::new("IoError", "refused")));
    let out = LineRenderer::new().template("%context%").render(&record);
    assert!(out.contains("\"class\":\"IoError\""));
    assert!(out.contains("\"message\":\"refused\""));
}

#[test]
fn template_records_which_placeholders_it_uses() {
    let template = Template::parse("%message% %memory%");
    assert!(template.uses(Placeholder::Message));
    assert!(template.uses(Placeholder::Memory));
    assert!(!template.uses(Placeholder::Context));
}
