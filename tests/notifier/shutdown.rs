use super::{config, notifier_for, orders_request, API_KEY};
use error_relay::{FlushOutcome, HostSnapshot, LastError, MemoryTransport, Notifier, Severity};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn fatal_last_error_joins_the_request_batch() {
    let host = HostSnapshot::for_request(orders_request())
        .with_last_error(LastError::new(
            Severity::FATAL_ERROR,
            "allowed memory size exhausted",
        ));
    let (mut notifier, transport) = notifier_for(config(), host);

    notifier.notify_error("Timeout", "inventory", None);
    let outcome = notifier.shutdown();

    assert!(matches!(outcome, FlushOutcome::Delivered { events: 2 }));
    let deliveries = transport.deliveries();
    let fatal = &deliveries[0].events()[1]["exceptions"][0];
    assert_eq!(fatal["errorClass"], "Fatal Error");
    assert_eq!(fatal["message"], "allowed memory size exhausted");

    let frames = fatal["stacktrace"].as_array().unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["file"], "[internal]");
    assert_eq!(frames[0]["lineNumber"], 0);
    assert_eq!(frames[0]["method"], "[unknown]");
}

#[test]
fn fatal_last_error_keeps_its_location() {
    let host = HostSnapshot::script()
        .with_document_root("/srv/app")
        .with_last_error(
            LastError::new(Severity::PARSE_ERROR, "unexpected '}'")
                .at("/srv/app/src/routes.rs", 19),
        );
    let (mut notifier, transport) = notifier_for(config(), host);

    assert!(matches!(
        notifier.shutdown(),
        FlushOutcome::Delivered { events: 1 }
    ));

    let deliveries = transport.deliveries();
    let frame = &deliveries[0].events()[0]["exceptions"][0]["stacktrace"][0];
    assert_eq!(frame["file"], "src/routes.rs");
    assert_eq!(frame["lineNumber"], 19);
    assert_eq!(frame["inProject"], true);
}

#[test]
fn recoverable_last_error_is_not_reported() {
    let warning = LastError::new(Severity::WARNING, "deprecated call");
    let host = HostSnapshot::script().with_last_error(warning);
    let (mut notifier, transport) = notifier_for(config(), host);

    assert!(matches!(notifier.shutdown(), FlushOutcome::Empty));
    assert_eq!(transport.delivery_count(), 0);
}

#[test]
fn shutdown_hooks_run_after_flush() {
    let host = HostSnapshot::for_request(orders_request());
    let (mut notifier, transport) = notifier_for(config(), host);
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let observed = transport.clone();
    notifier.chain_shutdown_hook(move || {
        assert_eq!(observed.delivery_count(), 1);
        counter.fetch_add(1, Ordering::SeqCst);
    });

    notifier.notify_error("Timeout", "inventory", None);
    notifier.shutdown();
    drop(notifier);

    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn registration_defaults_project_root_to_document_root() {
    let host = HostSnapshot::script().with_document_root("/var/www/shop");
    let (notifier, _) = notifier_for(config(), host);
    assert_eq!(
        notifier.config().project_root().map(|root| root.as_str()),
        Some("/var/www/shop")
    );

    let host = HostSnapshot::script().with_document_root("/var/www/shop");
    let config = config().with_project_root("/opt/shop");
    let mut notifier = Notifier::new(config, host, MemoryTransport::new());
    notifier.register(API_KEY);
    assert_eq!(
        notifier.config().project_root().map(|root| root.as_str()),
        Some("/opt/shop")
    );
}
