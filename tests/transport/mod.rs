use error_relay::stacktrace::build_stacktrace;
use error_relay::transport::{NotifierInfo, CONNECTION, CONTENT_TYPE, FORM_FIELD};
use error_relay::types::into_tree;
use error_relay::{ErrorReport, Event, MemoryTransport, MetaData, Payload, Transport};
use serde_json::{json, Value};

#[cfg(feature = "http")]
mod http;

pub(crate) fn sample_events() -> Vec<Event> {
    let trace = build_stacktrace("src/jobs.rs", 17, None, None);
    let report = ErrorReport::new("JobFailed", "a&b=c 100%", trace);
    vec![Event::new("production", report)]
}

const ENDPOINT: &str = "http://errors.example.com/notify";

fn decode_form(body: &str) -> Value {
    let (field, json) = url::form_urlencoded::parse(body.as_bytes())
        .next()
        .unwrap();
    assert_eq!(field, FORM_FIELD);
    serde_json::from_str(&json).unwrap()
}

#[test]
fn payload_document_shape() {
    let events = sample_events();
    let meta = into_tree(json!({ "job": { "queue": "mail" } })).unwrap();
    let payload = Payload::new("abc123", &events, &meta);

    let document: Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
    assert_eq!(document["apiKey"], "abc123");
    assert_eq!(document["notifier"]["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(document["notifier"]["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(document["events"].as_array().map(Vec::len), Some(1));
    assert_eq!(document["metaData"]["job"]["queue"], "mail");
}

#[test]
fn form_body_round_trips_reserved_characters() {
    let events = sample_events();
    let meta = MetaData::new();
    let payload = Payload::new("abc123", &events, &meta);

    let body = payload.to_form_body().unwrap();
    assert!(body.starts_with("data="));
    assert!(!body.contains('&'));
    assert!(!body.contains('{'));

    let document = decode_form(&body);
    assert_eq!(
        document["events"][0]["exceptions"][0]["message"],
        "a&b=c 100%"
    );
}

#[test]
fn memory_transport_records_and_shares_deliveries() {
    let events = sample_events();
    let meta = MetaData::new();
    let payload = Payload::new("abc123", &events, &meta);

    let recorder = MemoryTransport::new();
    let mut transport = recorder.clone();
    transport.deliver(ENDPOINT, &payload).unwrap();

    assert_eq!(recorder.delivery_count(), 1);
    let delivery = &recorder.deliveries()[0];
    assert_eq!(delivery.endpoint, ENDPOINT);
    assert_eq!(delivery.events().len(), 1);
    assert_eq!(decode_form(&delivery.body), delivery.payload);

    recorder.clear();
    assert_eq!(recorder.delivery_count(), 0);
}

#[test]
fn failing_transport_still_records() {
    let events = sample_events();
    let meta = MetaData::new();
    let payload = Payload::new("abc123", &events, &meta);

    let mut transport = MemoryTransport::failing("connection refused");
    let err = transport.deliver(ENDPOINT, &payload).unwrap_err();

    assert!(err.to_string().contains("connection refused"));
    assert!(!err.is_configuration());
    assert_eq!(transport.delivery_count(), 1);
}

#[test]
fn wire_constants() {
    assert_eq!(CONTENT_TYPE, "application/x-www-form-urlencoded");
    assert_eq!(CONNECTION, "close");
    assert_eq!(NotifierInfo::current().name, "error-relay");
}
