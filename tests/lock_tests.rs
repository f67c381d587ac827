// tests/lock_tests.rs
use protonup_gtk::lock::{is_locked_at, wait_until_idle_at, OperationLock};
use std::time::Duration;

#[test]
fn acquire_is_exclusive_and_released_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("protonup");

    assert!(!is_locked_at(&marker));

    let guard = OperationLock::acquire_at(&marker).unwrap();
    assert!(is_locked_at(&marker));

    // A second acquisition while the marker exists must fail.
    assert!(OperationLock::acquire_at(&marker).is_err());

    drop(guard);
    assert!(!is_locked_at(&marker));
}

#[test]
fn wait_reports_busy_while_held() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("protonup");

    let guard = OperationLock::acquire_at(&marker).unwrap();
    assert!(!wait_until_idle_at(&marker, Duration::from_millis(50)));

    drop(guard);
    assert!(wait_until_idle_at(&marker, Duration::from_millis(50)));
}

#[test]
fn wait_on_idle_marker_returns_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("protonup");
    assert!(wait_until_idle_at(&marker, Duration::ZERO));
}
