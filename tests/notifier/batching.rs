use super::{config, orders_request, request_notifier, script_notifier, API_KEY};
use error_relay::transport::Transport;
use error_relay::{
    Config, FlushOutcome, HostSnapshot, MemoryTransport, Notifier, NotifyOutcome, Payload,
    RelayError, RelayResult,
};

#[test]
fn script_reports_are_delivered_one_by_one() {
    let (mut notifier, transport) = script_notifier(config());

    let first = notifier.notify_error("CacheMiss", "user:1", None);
    let second = notifier.notify_error("CacheMiss", "user:2", None);

    assert!(matches!(
        first,
        NotifyOutcome::Flushed(FlushOutcome::Delivered { events: 1 })
    ));
    assert!(matches!(
        second,
        NotifyOutcome::Flushed(FlushOutcome::Delivered { events: 1 })
    ));
    assert_eq!(notifier.pending_events(), 0);

    let deliveries = transport.deliveries();
    assert_eq!(deliveries.len(), 2);
    assert!(deliveries.iter().all(|d| d.events().len() == 1));
    assert_eq!(deliveries[0].endpoint, "http://errors.example.com/notify");
    assert_eq!(deliveries[0].payload["apiKey"], API_KEY);
}

#[test]
fn request_reports_are_batched_until_shutdown() {
    let (mut notifier, transport) = request_notifier(config(), orders_request());

    for (i, service) in ["inventory", "pricing", "shipping"].into_iter().enumerate() {
        let outcome = notifier.notify_error("Timeout", service, None);
        assert!(matches!(
            outcome,
            NotifyOutcome::Queued { pending } if pending == i + 1
        ));
    }
    assert_eq!(transport.delivery_count(), 0);

    let outcome = notifier.shutdown();
    assert!(matches!(outcome, FlushOutcome::Delivered { events: 3 }));
    assert_eq!(notifier.pending_events(), 0);

    let deliveries = transport.deliveries();
    assert_eq!(deliveries.len(), 1);
    let messages: Vec<&str> = deliveries[0]
        .events()
        .iter()
        .filter_map(|event| event["exceptions"][0]["message"].as_str())
        .collect();
    assert_eq!(messages, ["inventory", "pricing", "shipping"]);
}

#[test]
fn dropping_a_registered_notifier_flushes_the_batch() {
    let transport = MemoryTransport::new();
    {
        let host = HostSnapshot::for_request(orders_request());
        let mut notifier = Notifier::new(config(), host, transport.clone());
        notifier.register(API_KEY);
        notifier.notify_error("Timeout", "inventory", None);
        assert_eq!(transport.delivery_count(), 0);
    }
    assert_eq!(transport.delivery_count(), 1);
}

#[test]
fn shutdown_runs_once_across_drop() {
    let (mut notifier, transport) = request_notifier(config(), orders_request());
    notifier.notify_error("Timeout", "inventory", None);

    assert!(notifier.shutdown().is_delivered());
    drop(notifier);

    assert_eq!(transport.delivery_count(), 1);
}

#[test]
fn manual_flush_sends_pending_events() {
    let (mut notifier, transport) = request_notifier(config(), orders_request());
    notifier.notify_error("Timeout", "inventory", None);

    assert_eq!(notifier.flush().events(), 1);
    assert!(matches!(notifier.flush(), FlushOutcome::Empty));
    assert_eq!(transport.delivery_count(), 1);
}

#[test]
fn request_attribution_defaults_to_client_and_route() {
    let (mut notifier, transport) = request_notifier(config(), orders_request());
    notifier.notify_error("Timeout", "inventory", None);
    notifier.shutdown();

    let deliveries = transport.deliveries();
    let event = &deliveries[0].events()[0];
    assert_eq!(event["userId"], "198.51.100.4");
    assert_eq!(event["context"], "GET /orders");
    assert_eq!(event["releaseStage"], "production");
}

#[test]
fn configured_attribution_overrides_request() {
    let config = config()
        .with_user_id("customer-42")
        .with_context("checkout");
    let (mut notifier, transport) = request_notifier(config, orders_request());
    notifier.notify_error("Timeout", "inventory", None);
    notifier.shutdown();

    let deliveries = transport.deliveries();
    let event = &deliveries[0].events()[0];
    assert_eq!(event["userId"], "customer-42");
    assert_eq!(event["context"], "checkout");
}

#[test]
fn script_events_have_no_attribution() {
    let (mut notifier, transport) = script_notifier(config());
    notifier.notify_error("Timeout", "inventory", None);

    let deliveries = transport.deliveries();
    let event = &deliveries[0].events()[0];
    assert!(event["userId"].is_null());
    assert!(event["context"].is_null());
}

#[test]
fn failed_delivery_drops_the_batch() {
    let transport = MemoryTransport::failing("connection refused");
    let mut notifier = Notifier::new(config(), HostSnapshot::script(), transport.clone());
    notifier.register(API_KEY);

    let outcome = notifier.notify_error("Timeout", "inventory", None);
    match outcome {
        NotifyOutcome::Flushed(FlushOutcome::Failed { events, error }) => {
            assert_eq!(events, 1);
            assert!(matches!(error, RelayError::Delivery { .. }));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(notifier.pending_events(), 0);

    notifier.notify_error("Timeout", "pricing", None);
    let deliveries = transport.deliveries();
    assert_eq!(deliveries.len(), 2);
    assert_eq!(deliveries[1].events().len(), 1);
}

#[test]
fn missing_endpoint_drops_the_batch_without_sending() {
    let (mut notifier, transport) = script_notifier(Config::default());

    let outcome = notifier.notify_error("Timeout", "inventory", None);
    match outcome {
        NotifyOutcome::Flushed(FlushOutcome::Failed { error, .. }) => {
            assert!(matches!(error, RelayError::MissingEndpoint));
            assert!(error.is_configuration());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(transport.delivery_count(), 0);
}

struct PanickingTransport;

impl Transport for PanickingTransport {
    fn deliver(&mut self, _endpoint: &str, _payload: &Payload<'_>) -> RelayResult<()> {
        panic!("socket exploded");
    }
}

#[test]
fn transport_panic_is_contained() {
    let mut notifier = Notifier::new(config(), HostSnapshot::script(), PanickingTransport);
    notifier.register(API_KEY);

    let outcome = notifier.notify_error("Timeout", "inventory", None);
    assert!(matches!(
        outcome,
        NotifyOutcome::Flushed(FlushOutcome::Failed { events: 1, .. })
    ));
}
