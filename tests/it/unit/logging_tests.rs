//! Unit tests for logging setup.

use dragzone::logging;

#[test]
fn test_init_is_idempotent() {
    // A second install reports the existing subscriber
    let _ = logging::init().unwrap();
    assert!(!logging::init().unwrap());
}

#[test]
fn test_default_filter_targets_crate() {
    assert!(logging::DEFAULT_FILTER.starts_with("dragzone="));
}
