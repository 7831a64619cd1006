//! Tests for the boxed renderer.

use chanlog::render::Color;
use chanlog::{BoxedRenderer, Exception, Fields, Frame, Level, Record, Renderer};
use chrono::{Local, TimeZone};

fn at() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap()
}

fn framed(out: &str) -> Vec<&str> {
    out.lines().collect()
}

#[test]
fn every_line_has_the_block_width() {
    let record = Record::new("app.http", Level::Error, "boom ".repeat(40))
        .with_context(Fields::new().with("host", "db1").with("note", "n ".repeat(60)))
        .at(at());

    for width in [40, 80, 120] {
        for padding in [10, 20, 40] {
            let out = BoxedRenderer::new()
                .width(width)
                .key_padding(padding)
                .render(&record);
            for line in framed(&out) {
                assert_eq!(line.chars().count(), width, "{width}/{padding}: {line}");
            }
        }
    }
}

#[test]
fn widest_key_column_in_narrowest_block() {
    let record = Record::new("app", Level::Info, "m")
        .with_context(Fields::new().with("blob", "x".repeat(100)));
    let out = BoxedRenderer::new().width(40).key_padding(40).render(&record);
    let lines = framed(&out);

    for line in &lines {
        assert_eq!(line.chars().count(), 40, "{line}");
    }
    assert!(lines.len() < 20, "{} rows", lines.len());
    assert_eq!(out.matches('x').count(), 100);
}

#[test]
fn width_never_drops_below_forty() {
    let out = BoxedRenderer::new().width(10).render(&Record::new("a", Level::Info, "m"));
    assert_eq!(framed(&out)[0].chars().count(), 40);
}

#[test]
fn layout_with_message_only() {
    let record = Record::new("app", Level::Info, "hello").at(at());
    let out = BoxedRenderer::new().width(40).render(&record);
    let lines = framed(&out);

    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with('┌') && lines[0].ends_with('┐'));
    assert_eq!(
        lines[1],
        format!("│ {:<36} │", "2025-01-15 14:30:00  INFO  app")
    );
    assert!(lines[2].starts_with('├'));
    assert_eq!(lines[3], format!("│ {:<36} │", "MESSAGE"));
    assert_eq!(lines[4], format!("│ {:<36} │", "  hello"));
    assert!(lines[5].starts_with('└') && lines[5].ends_with('┘'));
    assert!(!out.contains("CONTEXT"));
    assert!(!out.contains("EXTRA"));
    assert!(!out.contains("EXCEPTION"));
}

#[test]
fn context_keys_are_padded() {
    let record =
        Record::new("app", Level::Info, "m").with_context(Fields::new().with("host", "db1"));

    let out = BoxedRenderer::new().render(&record);
    assert!(out.contains(&format!("│ {:<76} │", format!("  {:<20} = db1", "host"))));

    let out = BoxedRenderer::new().key_padding(12).render(&record);
    assert!(out.contains(&format!("  {:<12} = db1", "host")));
}

#[test]
fn key_padding_is_clamped() {
    assert_eq!(BoxedRenderer::new().key_padding(2).get_key_padding(), 10);
    assert_eq!(BoxedRenderer::new().key_padding(99).get_key_padding(), 40);
    assert_eq!(BoxedRenderer::new().key_padding(25).get_key_padding(), 25);
}

#[test]
fn large_values_are_elided() {
    let record = Record::new("app", Level::Info, "m").with_context(
        Fields::new()
            .with("blob", "x".repeat(200))
            .with("ids", vec![1, 2, 3, 4, 5, 6])
            .with("small", vec![1, 2])
            .with(
                "map",
                Fields::from([("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5), ("f", 6)]),
            ),
    );
    let out = BoxedRenderer::new().width(200).render(&record);

    assert!(out.contains(&format!("{}... [200 chars]", "x".repeat(120))));
    assert!(!out.contains(&"x".repeat(121)));
    assert!(out.contains("= [6 items]"));
    assert!(out.contains("= [1,2]"));
    assert!(out.contains("= {6 keys}"));
}

#[test]
fn extra_section_follows_context() {
    let record = Record::new("app", Level::Info, "m")
        .with_context(Fields::new().with("a", 1))
        .with_extra(Fields::new().with("b", 2));
    let out = BoxedRenderer::new().render(&record);

    let context = out.find("CONTEXT").unwrap();
    let extra = out.find("EXTRA").unwrap();
    assert!(context < extra);
    assert_eq!(out.matches('├').count(), 3);
}

#[test]
fn exception_section() {
    let exc = Exception::new("RuntimeError", "connection refused")
        .code(42)
        .at("src/db.rs", 17)
        .frames((0..25).map(|i| Frame::new("src/db.rs", i).function("query")))
        .caused_by(Exception::new("IoError", "reset by peer"));
    let record = Record::new("app", Level::Error, "boom")
        .with_context(Fields::new().with("exception", exc));
    let out = BoxedRenderer::new().render(&record);

    assert!(!out.contains("CONTEXT"));
    assert!(out.contains("│ EXCEPTION "));
    assert!(out.contains("│   RuntimeError: connection refused "));
    assert!(out.contains("│     at src/db.rs:17 "));
    assert!(out.contains("│     code 42 "));
    assert!(out.contains("│     #0 src/db.rs:0 query() "));
    assert!(out.contains("│     #9 src/db.rs:9 query() "));
    assert!(!out.contains("#10 "));
    assert!(out.contains("│     ... and 15 more frames "));
    assert!(out.contains("│   Caused by: IoError: reset by peer "));
}

#[test]
fn trace_frames_zero_hides_frames() {
    let exc = Exception::new("E", "x").frame(Frame::new("a.rs", 1));
    let record =
        Record::new("app", Level::Error, "boom").with_context(Fields::new().with("e", exc));
    let out = BoxedRenderer::new().trace_frames(0).render(&record);
    assert!(!out.contains("#0"));
    assert!(!out.contains("more frames"));
}

#[test]
fn deep_cause_chain_is_marked() {
    let mut exc = Exception::new("E14", "m14");
    for i in (0..14).rev() {
        exc = Exception::new(format!("E{i}"), format!("m{i}")).caused_by(exc);
    }
    let record =
        Record::new("app", Level::Error, "boom").with_context(Fields::new().with("e", exc));
    let out = BoxedRenderer::new().render(&record);

    assert_eq!(out.matches("Caused by:").count(), 10);
    assert!(out.contains("Caused by: E10 [max depth reached]"));
    assert!(!out.contains("E11"));
}

#[test]
fn colors_paint_the_level_only_when_enabled() {
    let record = Record::new("app", Level::Error, "boom");

    let plain = BoxedRenderer::new().render(&record);
    assert!(!plain.contains('\x1b'));

    let red = Color::new(255, 0, 0);
    let colored = BoxedRenderer::new()
        .colors(true)
        .level_color(Level::Error, red)
        .render(&record);
    assert!(colored.contains(&format!("{}ERROR{}", red.fg_ansi(), Color::RESET)));
    assert!(colored.contains(&format!("{}MESSAGE{}", Color::BOLD, Color::RESET)));
}

#[test]
fn batch_concatenates_blocks() {
    let record = Record::new("app", Level::Info, "m");
    let renderer = BoxedRenderer::new();
    let out = renderer.render_batch(&[record.clone(), record]);
    assert_eq!(out.matches('┌').count(), 2);
    assert_eq!(out.matches('└').count(), 2);
}
