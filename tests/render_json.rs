//! Tests for the JSON renderer.

use chanlog::{
    BatchMode, Exception, FieldFilter, Fields, Frame, JsonRenderer, Level, Record, Renderer,
};
use chrono::{Local, TimeZone};
use serde_json::{Value as Json, json};

fn record() -> Record {
    let at = Local.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();
    Record::new("app.http", Level::Error, "request failed")
        .with_context(Fields::new().with("status", 502).with("path", "/api/v1/users"))
        .with_extra(Fields::new().with("request_id", "req-1"))
        .at(at)
}

fn parse(out: &str) -> Json {
    serde_json::from_str(out.trim_end()).unwrap()
}

#[test]
fn single_record_members() {
    let out = JsonRenderer::new().render(&record());
    assert!(out.ends_with("}\n"));

    let json = parse(&out);
    assert_eq!(json["channel"], json!("app.http"));
    assert_eq!(json["level"], json!("error"));
    assert_eq!(json["level_value"], json!(400));
    assert_eq!(json["message"], json!("request failed"));
    assert_eq!(json["context"], json!({"status": 502, "path": "/api/v1/users"}));
    assert_eq!(json["extra"], json!({"request_id": "req-1"}));
    assert!(
        json["datetime"]
            .as_str()
            .unwrap()
            .starts_with("2025-01-15T14:30:00.000000")
    );
}

#[test]
fn member_order_is_stable() {
    let json = parse(&JsonRenderer::new().render(&record()));
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["datetime", "channel", "level", "level_value", "message", "context", "extra"]
    );
}

#[test]
fn slashes_and_unicode_are_not_escaped() {
    let record = Record::new("app", Level::Info, "grüße")
        .with_context(Fields::new().with("url", "https://example.com/a/b"));
    let out = JsonRenderer::new().render(&record);

    assert!(out.contains("https://example.com/a/b"));
    assert!(out.contains("grüße"));
}

#[test]
fn empty_maps_are_objects_unless_ignored() {
    let bare = Record::new("app", Level::Info, "hi");

    let json = parse(&JsonRenderer::new().render(&bare));
    assert_eq!(json["context"], json!({}));
    assert_eq!(json["extra"], json!({}));

    let json = parse(
        &JsonRenderer::new()
            .ignore_empty_context_and_extra(true)
            .render(&bare),
    );
    assert!(json.get("context").is_none());
    assert!(json.get("extra").is_none());
}

#[test]
fn append_newline_off() {
    let out = JsonRenderer::new().append_newline(false).render(&record());
    assert!(out.ends_with('}'));
}

#[test]
fn batch_as_json_array() {
    let out = JsonRenderer::new().render_batch(&[record(), record()]);
    assert_eq!(out.matches('\n').count(), 1);

    let json = parse(&out);
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[test]
fn batch_as_newline_delimited() {
    let renderer = JsonRenderer::new().batch_mode(BatchMode::Newlines);
    let out = renderer.render_batch(&[record(), record()]);

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert_eq!(parse(line)["channel"], json!("app.http"));
    }
    assert_eq!(renderer.render_batch(&[]), "");
}

#[test]
fn pretty_output_spans_lines() {
    let out = JsonRenderer::new().pretty(true).render(&record());
    assert!(out.lines().count() > 5);
    assert_eq!(parse(&out)["level"], json!("error"));
}

#[test]
fn max_length_truncates_oversized_members() {
    let long = "x".repeat(500);
    let record = Record::new("app", Level::Info, "m")
        .with_context(Fields::new().with("blob", long));
    let json = parse(&JsonRenderer::new().max_length(Some(50)).render(&record));

    let context = json["context"].as_str().unwrap();
    assert_eq!(context.chars().count(), 53);
    assert!(context.starts_with("{\"blob\":\"xxx"));
    assert!(context.ends_with("..."));
    assert_eq!(json["extra"], json!({}));
}

#[test]
fn field_filter_drops_members() {
    let renderer = JsonRenderer::new().field_filter(FieldFilter::new().exclude(["extra", "datetime"]));
    let json = parse(&renderer.render(&record()));

    assert!(json.get("extra").is_none());
    assert!(json.get("datetime").is_none());
    assert_eq!(json["channel"], json!("app.http"));
}

#[test]
fn exceptions_with_traces() {
    let exc = Exception::new("RuntimeError", "boom")
        .at("src/db.rs", 17)
        .frames((0..25).map(|i| Frame::new("src/db.rs", i).function("query")))
        .caused_by(Exception::new("IoError", "refused"));
    let record = Record::new("app", Level::Critical, "db down")
        .with_context(Fields::new().with("exception", exc));

    let json = parse(&JsonRenderer::new().render(&record));
    assert!(json["context"]["exception"].get("trace").is_none());
    assert_eq!(json["context"]["exception"]["previous"]["class"], json!("IoError"));

    let json = parse(&JsonRenderer::new().include_stacktraces(true).render(&record));
    let trace = json["context"]["exception"]["trace"].as_array().unwrap();
    assert_eq!(trace.len(), 21);
    assert_eq!(trace[0], json!("src/db.rs:0 query()"));
    assert_eq!(trace[20], json!("... (truncated)"));
}
