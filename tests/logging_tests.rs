use newsdigest::setup_logging;

#[test]
fn test_logging_setup() {
    // Catch any panics in a controlled way to isolate this test
    let result = std::panic::catch_unwind(|| {
        setup_logging();
    });

    assert!(result.is_ok(), "setup_logging function should not panic");
}

#[test]
fn test_logging_setup_twice() {
    // Each stage binary calls this once, but tests and library users may repeat it
    setup_logging();
    setup_logging();
}
