//! Tests for records, fields and exception chains.

use chanlog::{Exception, Fields, Frame, Level, Record, Value};
use std::fmt;

#[test]
fn fields_keep_insertion_order_and_replace_in_place() {
    let mut fields = Fields::new().with("b", 1).with("a", 2).with("c", 3);
    let old = fields.insert("a", "two");

    assert_eq!(old, Some(Value::Int(2)));
    assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    assert_eq!(fields.get("a").and_then(Value::as_str), Some("two"));
}

#[test]
fn fields_remove_keeps_lookups_consistent() {
    let mut fields: Fields = (0..1000).map(|i| (format!("k{i}"), i)).collect();
    assert_eq!(fields.len(), 1000);

    assert_eq!(fields.remove("k10"), Some(Value::Int(10)));
    assert_eq!(fields.remove("k10"), None);
    assert!(!fields.contains_key("k10"));
    assert_eq!(fields.get("k11"), Some(&Value::Int(11)));
    assert_eq!(fields.get("k999"), Some(&Value::Int(999)));

    fields.insert("k10", "back");
    assert_eq!(fields.keys().last(), Some("k10"));
    assert_eq!(fields.insert("k500", 0), Some(Value::Int(500)));
    assert_eq!(fields.len(), 1000);

    fields.clear();
    assert!(fields.get("k1").is_none());
    assert_eq!(fields, Fields::new());
}

#[test]
fn fields_extend_later_keys_win() {
    let mut base = Fields::from([("env", "prod"), ("region", "eu")]);
    base.extend(Fields::from([("env", "staging"), ("zone", "b")]));

    assert_eq!(base.len(), 3);
    assert_eq!(base.get("env").and_then(Value::as_str), Some("staging"));
    assert_eq!(base.keys().collect::<Vec<_>>(), vec!["env", "region", "zone"]);
}

#[test]
fn value_conversions() {
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(7u8), Value::Int(7));
    assert_eq!(Value::from(Some("x")), Value::String("x".to_string()));
    assert_eq!(Value::from(None::<i32>), Value::Null);
    assert_eq!(
        Value::from(vec![1, 2]),
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );

    let json = serde_json::json!({"a": [1, "b", null], "c": 1.5});
    let Value::Map(map) = Value::from(json) else {
        panic!("expected a map");
    };
    assert_eq!(
        map.get("a"),
        Some(&Value::List(vec![
            Value::Int(1),
            Value::String("b".to_string()),
            Value::Null
        ]))
    );
    assert_eq!(map.get("c"), Some(&Value::Float(1.5)));
}

#[test]
fn frame_display() {
    let frame = Frame::new("src/db.rs", 17).class("Pool").function("connect");
    assert_eq!(frame.to_string(), "src/db.rs:17 Pool::connect()");
    assert_eq!(Frame::default().function("main").to_string(), "[internal] main()");
}

#[test]
fn exception_display_and_chain() {
    let exc = Exception::new("RuntimeError", "boom")
        .code(42)
        .at("src/db.rs", 17)
        .caused_by(Exception::new("IoError", "refused"));

    assert_eq!(exc.to_string(), "RuntimeError(42): boom at src/db.rs:17");
    let classes: Vec<&str> = exc.chain().map(|e| e.class.as_str()).collect();
    assert_eq!(classes, vec!["RuntimeError", "IoError"]);
}

#[derive(Debug)]
struct Outer(Inner);

#[derive(Debug)]
struct Inner;

impl fmt::Display for Outer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("query failed")
    }
}

impl fmt::Display for Inner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("connection reset")
    }
}

impl std::error::Error for Inner {}

impl std::error::Error for Outer {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

#[test]
fn exception_from_error_walks_sources() {
    let exc = Exception::from_error(&Outer(Inner));

    assert_eq!(exc.class, "Outer");
    assert_eq!(exc.message, "query failed");
    let previous = exc.previous.as_deref().unwrap();
    assert_eq!(previous.message, "connection reset");
    assert!(previous.previous.is_none());
}

#[test]
fn record_exception_prefers_exception_key() {
    let first = Exception::new("First", "a");
    let named = Exception::new("Named", "b");
    let record = Record::new("app", Level::Error, "failed").with_context(
        Fields::new()
            .with("other", first)
            .with("exception", named),
    );

    let (key, exc) = record.exception().unwrap();
    assert_eq!(key, "exception");
    assert_eq!(exc.class, "Named");
}

#[test]
fn record_exception_falls_back_to_first_exception_value() {
    let record = Record::new("app", Level::Error, "failed")
        .with_context(Fields::new().with("n", 1).with("err", Exception::new("E", "x")));

    let (key, exc) = record.exception().unwrap();
    assert_eq!(key, "err");
    assert_eq!(exc.class, "E");
}

#[test]
fn request_id_reads_extra_then_context() {
    let record = Record::new("app", Level::Info, "m")
        .with_context(Fields::new().with("request_id", "ctx"))
        .with_extra(Fields::new().with("request_id", "extra"));
    assert_eq!(record.request_id().as_deref(), Some("extra"));

    let record = Record::new("app", Level::Info, "m")
        .with_context(Fields::new().with("request_id", 99));
    assert_eq!(record.request_id().as_deref(), Some("99"));

    let record = Record::new("app", Level::Info, "m")
        .with_extra(Fields::new().with("request_id", ""));
    assert_eq!(record.request_id(), None);
}
