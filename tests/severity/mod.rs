use error_relay::Severity;

#[test]
fn fatal_set_matches_process_ending_kinds() {
    for fatal in [
        Severity::FATAL_ERROR,
        Severity::PARSE_ERROR,
        Severity::CORE_ERROR,
        Severity::CORE_WARNING,
        Severity::COMPILE_ERROR,
        Severity::COMPILE_WARNING,
        Severity::STRICT,
    ] {
        assert!(fatal.is_fatal(), "{fatal} should be fatal");
    }

    for recoverable in [
        Severity::WARNING,
        Severity::NOTICE,
        Severity::USER_ERROR,
        Severity::DEPRECATED,
    ] {
        assert!(!recoverable.is_fatal(), "{recoverable} should not be fatal");
    }
    assert!(!Severity::NONE.is_fatal());
}

#[test]
fn names_serve_as_error_classes() {
    assert_eq!(Severity::WARNING.name(), "Warning");
    assert_eq!(Severity::USER_NOTICE.name(), "User Notice");
    assert_eq!(Severity::STRICT.to_string(), "Strict Standards");
    assert_eq!((Severity::WARNING | Severity::NOTICE).name(), "Error");
}

#[test]
fn masks_combine_with_bit_operators() {
    let mask = Severity::ALL & !(Severity::NOTICE | Severity::DEPRECATED);

    assert!(mask.intersects(Severity::WARNING));
    assert!(!mask.intersects(Severity::NOTICE));
    assert!(!mask.intersects(Severity::DEPRECATED));
    assert!(Severity::ALL.contains(mask));
    assert_eq!(!Severity::ALL, Severity::NONE);
}

#[test]
fn bits_round_trip_through_u32() {
    assert_eq!(Severity::from(8), Severity::NOTICE);
    assert_eq!(Severity::from_bits(Severity::ALL.bits()), Severity::ALL);
    assert_eq!(Severity::default(), Severity::ALL);
}
