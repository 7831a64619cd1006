//! Tests for the bundled record processors.

use chanlog::{
    Fields, Level, MemoryUsageProcessor, ProcessIdProcessor, Processor, Record,
    RequestIdProcessor, TagProcessor, Value,
};

fn record() -> Record {
    Record::new("app", Level::Info, "m")
}

#[test]
fn request_id_is_fixed_per_processor() {
    let processor = RequestIdProcessor::new();
    assert_eq!(processor.id().len(), 26);

    let a = processor.process(record());
    let b = processor.process(record());
    assert_eq!(a.request_id().as_deref(), Some(processor.id()));
    assert_eq!(a.request_id(), b.request_id());

    assert_ne!(RequestIdProcessor::new().id(), processor.id());
}

#[test]
fn request_id_with_explicit_value_overrides_context() {
    let processed = RequestIdProcessor::with_id("r-1").process(
        record().with_context(Fields::new().with("request_id", "from-context")),
    );
    assert_eq!(processed.request_id().as_deref(), Some("r-1"));
    assert_eq!(
        processed.context().get("request_id").and_then(Value::as_str),
        Some("from-context")
    );
}

#[test]
fn process_id() {
    let processed = ProcessIdProcessor.process(record());
    assert_eq!(
        processed.extra().get("pid"),
        Some(&Value::Int(i64::from(std::process::id())))
    );
}

#[test]
fn memory_usage_is_numeric_when_present() {
    let processed = MemoryUsageProcessor.process(record());
    if let Some(value) = processed.extra().get("memory_usage") {
        assert!(matches!(value, Value::Int(bytes) if *bytes > 0));
    }
}

#[test]
fn tags_append() {
    let first = TagProcessor::new(["api"]).tag("v2");
    let second = TagProcessor::new(["audit"]);

    let processed = second.process(first.process(record()));
    assert_eq!(
        processed.extra().get("tags"),
        Some(&Value::from(vec!["api", "v2", "audit"]))
    );
}

#[test]
fn tags_wrap_a_scalar_existing_value() {
    let processed = TagProcessor::new(["b"])
        .process(record().with_extra(Fields::new().with("tags", "a")));
    assert_eq!(
        processed.extra().get("tags"),
        Some(&Value::from(vec!["a", "b"]))
    );
}

#[test]
fn closures_implement_processor() {
    let upper = |mut r: Record| {
        let message = r.message().to_uppercase();
        r.set_message(message);
        r
    };
    assert_eq!(upper.process(record()).message(), "M");
}

#[test]
fn processors_can_redact_context() {
    let redact = |mut r: Record| {
        if r.context().contains_key("password") {
            r.context_mut().insert("password", "***");
        }
        r.context_mut().remove("token");
        r
    };
    let processed = redact.process(
        record().with_context(
            Fields::new()
                .with("user", "ada")
                .with("password", "hunter2")
                .with("token", "t-1"),
        ),
    );

    let keys: Vec<&str> = processed.context().keys().collect();
    assert_eq!(keys, vec!["user", "password"]);
    assert_eq!(
        processed.context().get("password").and_then(Value::as_str),
        Some("***")
    );
}
