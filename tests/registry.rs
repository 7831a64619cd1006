//! Tests for the named logger registry.

use chanlog::registry::DEFAULT_NAME;
use chanlog::{Logger, Registry, Resolved};
use std::sync::Arc;

fn logger(channel: &str) -> Arc<Logger> {
    Arc::new(Logger::new(channel, Resolved::default()))
}

#[test]
fn register_under_channel_or_explicit_name() {
    let registry = Registry::new();
    assert_eq!(registry.register(logger("app.http"), None, false), "app.http");
    assert_eq!(registry.register(logger("app.db"), Some("db"), false), "db");

    assert!(registry.has("app.http"));
    assert!(registry.has("db"));
    assert!(!registry.has("app.db"));
    assert_eq!(registry.names(), vec!["app.http", "db"]);
    assert_eq!(registry.get(Some("db")).unwrap().channel(), "app.db");
}

#[test]
fn first_registration_becomes_the_default() {
    let registry = Registry::new();
    registry.register(logger("first"), None, false);
    registry.register(logger("second"), None, false);

    assert_eq!(registry.default_name(), "first");
    assert_eq!(registry.get(None).unwrap().channel(), "first");

    registry.register(logger("third"), None, true);
    assert_eq!(registry.get(None).unwrap().channel(), "third");
}

#[test]
fn absent_name_without_default_uses_the_fallback() {
    let registry = Registry::new();
    assert_eq!(registry.default_name(), DEFAULT_NAME);
    assert!(registry.get(None).is_none());

    let registry = Registry::with_fallback("main");
    assert_eq!(registry.default_name(), "main");
}

#[test]
fn removing_the_default_keeps_the_pointer() {
    let registry = Registry::new();
    registry.register(logger("app"), None, false);
    let removed = registry.remove("app").unwrap();
    assert_eq!(removed.channel(), "app");

    assert_eq!(registry.default_name(), "app");
    assert!(registry.get(None).is_none());

    registry.register(logger("app"), None, false);
    assert!(registry.get(None).is_some());
}

#[test]
fn reregistering_replaces_the_entry() {
    let registry = Registry::new();
    let first = logger("app");
    let second = logger("app");
    registry.register(Arc::clone(&first), None, false);
    registry.register(Arc::clone(&second), None, false);

    assert!(Arc::ptr_eq(&registry.get(Some("app")).unwrap(), &second));
    assert_eq!(registry.names().len(), 1);
}

#[test]
fn clear_forgets_everything() {
    let registry = Registry::new();
    registry.register(logger("a"), None, false);
    registry.register(logger("b"), None, true);
    registry.clear();

    assert!(registry.names().is_empty());
    assert_eq!(registry.default_name(), DEFAULT_NAME);
}

#[test]
fn global_is_a_single_instance() {
    assert!(std::ptr::eq(Registry::global(), Registry::global()));
}
