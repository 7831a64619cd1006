//! Tests for value normalization and display sanitizing.

use chanlog::normalize::{
    MAX_DEPTH_MESSAGE, TRACE_TRUNCATED, collapse_newlines, sanitize, trace_lines, truncate,
};
use chanlog::{Exception, FieldFilter, Fields, Frame, Normalizer, Object, SelfDescribing, Value};
use serde_json::{Value as Json, json};

fn chain(len: usize) -> Exception {
    let mut exc = Exception::new(format!("E{}", len - 1), format!("m{}", len - 1));
    for i in (0..len - 1).rev() {
        exc = Exception::new(format!("E{i}"), format!("m{i}")).caused_by(exc);
    }
    exc
}

fn with_frames(count: u32) -> Exception {
    Exception::new("RuntimeError", "boom")
        .frames((0..count).map(|i| Frame::new(format!("src/f{i}.rs"), i).function("run")))
}

#[test]
fn scalars() {
    let n = Normalizer::new();
    assert_eq!(n.value(&Value::Null), Json::Null);
    assert_eq!(n.value(&Value::from(true)), json!(true));
    assert_eq!(n.value(&Value::from(-3)), json!(-3));
    assert_eq!(n.value(&Value::from(1.5)), json!(1.5));
    assert_eq!(n.value(&Value::from("x")), json!("x"));
}

#[test]
fn non_finite_floats_become_strings() {
    let n = Normalizer::new();
    assert_eq!(n.value(&Value::from(f64::NAN)), json!("NaN"));
    assert_eq!(n.value(&Value::from(f64::INFINITY)), json!("INF"));
    assert_eq!(n.value(&Value::from(f64::NEG_INFINITY)), json!("-INF"));
}

#[test]
fn deep_nesting_is_cut_off() {
    let mut value = Value::from("leaf");
    for _ in 0..15 {
        value = Value::List(vec![value]);
    }

    let mut json = Normalizer::new().max_depth(3).value(&value);
    let mut levels = 0;
    while let Json::Array(mut items) = json {
        json = items.remove(0);
        levels += 1;
    }
    assert_eq!(levels, 4);
    assert_eq!(json, json!("Over 3 levels deep, aborting normalization"));
}

#[test]
fn long_lists_and_maps_are_summarized() {
    let n = Normalizer::new().max_items(3);

    let list = Value::from(vec![1, 2, 3, 4, 5]);
    assert_eq!(
        n.value(&list),
        json!([1, 2, 3, "Over 3 items (5 total), aborting normalization"])
    );

    let fields: Fields = (0..5).map(|i| (format!("k{i}"), i)).collect();
    let map = n.fields(&fields);
    assert_eq!(map.len(), 4);
    assert_eq!(
        map.get("..."),
        Some(&json!("Over 3 items (5 total), aborting normalization"))
    );
}

#[test]
fn map_order_is_preserved() {
    let fields = Fields::new().with("z", 1).with("a", 2).with("m", 3);
    let map = Normalizer::new().fields(&fields);
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
}

struct Opaque;

impl Object for Opaque {
    fn type_name(&self) -> &str {
        "app::Opaque"
    }
}

struct Point;

impl SelfDescribing for Point {
    fn describe(&self) -> Value {
        Value::Map(Fields::new().with("x", 1).with("y", 2))
    }
}

impl Object for Point {
    fn type_name(&self) -> &str {
        "geo::Point"
    }

    fn self_describing(&self) -> Option<&dyn SelfDescribing> {
        Some(self)
    }
}

#[test]
fn objects_render_as_type_marker_or_description() {
    let n = Normalizer::new();
    assert_eq!(n.value(&Value::object(Opaque)), json!("[app::Opaque]"));
    assert_eq!(n.value(&Value::object(Point)), json!({"x": 1, "y": 2}));
}

#[test]
fn exception_fields() {
    let exc = Exception::new("RuntimeError", "boom").code(42).at("src/db.rs", 17);
    let json = Normalizer::new().exception(&exc);

    assert_eq!(
        json,
        json!({
            "class": "RuntimeError",
            "message": "boom",
            "code": 42,
            "file": "src/db.rs:17",
        })
    );
}

#[test]
fn exception_chain_stops_at_max_depth() {
    let json = Normalizer::new().exception(&chain(15));

    let mut node = &json;
    let mut depth = 0;
    let mut markers = 0;
    loop {
        if node["message"] == json!(MAX_DEPTH_MESSAGE) {
            markers += 1;
        }
        match node.get("previous") {
            Some(previous) => {
                node = previous;
                depth += 1;
            }
            None => break,
        }
    }

    assert_eq!(depth, 10);
    assert_eq!(markers, 1);
    assert_eq!(node["class"], json!("E10"));
    assert!(node.get("code").is_none());
}

#[test]
fn traces_only_with_stacktraces_enabled() {
    let exc = with_frames(2);
    assert!(Normalizer::new().exception(&exc).get("trace").is_none());

    let json = Normalizer::new().include_stacktraces(true).exception(&exc);
    assert_eq!(
        json["trace"],
        json!(["src/f0.rs:0 run()", "src/f1.rs:1 run()"])
    );
}

#[test]
fn trace_is_capped_at_twenty_frames() {
    let lines = trace_lines(&with_frames(25));
    assert_eq!(lines.len(), 21);
    assert_eq!(lines[19], "src/f19.rs:19 run()");
    assert_eq!(lines[20], TRACE_TRUNCATED);

    assert_eq!(trace_lines(&with_frames(20)).len(), 20);
}

#[test]
fn field_filter_include_then_exclude() {
    let fields = Fields::new().with("a", 1).with("b", 2).with("c", 3);
    let mut map = Normalizer::new().fields(&fields);

    FieldFilter::new().include(["a", "b"]).exclude(["b"]).apply(&mut map);
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a"]);

    let mut map = Normalizer::new().fields(&fields);
    FieldFilter::new().include(Vec::<String>::new()).apply(&mut map);
    assert!(map.is_empty());

    assert!(FieldFilter::new().is_noop());
}

#[test]
fn sanitize_strips_escapes_and_controls() {
    assert_eq!(sanitize("\x1b[1;31mALERT\x1b[0m done"), "ALERT done");
    assert_eq!(sanitize("bell\x07 nul\x00"), "bell nul");
    assert_eq!(sanitize("keep\ttabs\nand lines"), "keep\ttabs\nand lines");
}

#[test]
fn collapse_and_truncate() {
    assert_eq!(collapse_newlines("a\r\nb\nc"), "a b c");
    assert_eq!(truncate("abcdef", 3), "abc...");
    assert_eq!(truncate("abc", 3), "abc");
}
