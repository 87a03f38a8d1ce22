//! Tests for the Causeway tracing setup.

use std::sync::Mutex;

use causeway_core::tracing::init_tracing;

static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}

#[test]
fn test_invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("CAUSEWAY_LOG", "=== not a filter ===");
    init_tracing();
    std::env::remove_var("CAUSEWAY_LOG");
}
