use error_relay::stacktrace::build_stacktrace;
use error_relay::types::{ErrorQueue, ErrorReport, Event};


fn event(class: &str) -> Event {
    let trace = build_stacktrace("src/main.rs", 1, None, None);
    Event::new("production", ErrorReport::new(class, "boom", trace))
}

#[test]
fn queue_keeps_report_order() {
    let mut queue = ErrorQueue::new();
    assert!(queue.is_empty());

    queue.push(event("First"));
    queue.push(event("Second"));
    queue.push(event("Third"));

    let classes: Vec<&str> = queue
        .iter()
        .map(|e| e.report().error_class.as_str())
        .collect();
    assert_eq!(classes, ["First", "Second", "Third"]);
    assert_eq!(queue.len(), 3);
}

#[test]
fn queue_serializes_as_plain_list() {
    let mut queue = ErrorQueue::new();
    queue.push(event("Only"));

    let value = serde_json::to_value(&queue).unwrap();
    assert!(value.is_array());
    assert_eq!(value[0]["exceptions"][0]["errorClass"], "Only");
}

#[test]
fn event_wire_shape() {
    let event = event("Timeout")
        .with_user_id(Some("10.0.0.7".into()))
        .with_context(Some("GET /orders".into()));

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["userId"], "10.0.0.7");
    assert_eq!(value["releaseStage"], "production");
    assert_eq!(value["context"], "GET /orders");

    let exceptions = value["exceptions"].as_array().unwrap();
    assert_eq!(exceptions.len(), 1);
    assert_eq!(exceptions[0]["message"], "boom");

    let frame = &exceptions[0]["stacktrace"][0];
    assert_eq!(frame["file"], "src/main.rs");
    assert_eq!(frame["lineNumber"], 1);
    assert_eq!(frame["method"], "[unknown]");
    assert_eq!(frame["inProject"], false);
}

#[test]
fn event_without_attribution_serializes_nulls() {
    let value = serde_json::to_value(event("Bare")).unwrap();
    assert!(value["userId"].is_null());
    assert!(value["context"].is_null());
}
