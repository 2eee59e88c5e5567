//! Tests for warning deduplication.

use thicket_common::warning::{
    clear_warnings, set_warnings_enabled, warn_once, warnings_enabled, was_reported,
};

#[test]
fn test_warn_once_records_and_clears() {
    set_warnings_enabled(false);
    assert!(!warnings_enabled());

    warn_once("Test", "first message");
    warn_once("Test", "first message");
    assert!(was_reported("Test", "first message"));
    assert!(!was_reported("Other", "first message"));

    clear_warnings();
    assert!(!was_reported("Test", "first message"));

    set_warnings_enabled(true);
    assert!(warnings_enabled());
}
