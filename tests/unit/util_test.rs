//! Tests for telemetry helpers

use cost_scout::util::{init_tracing, init_tracing_with, DEFAULT_FILTER};

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing_with("cost_scout=debug");
    tracing::info!("still logging after repeated init");
    assert!(DEFAULT_FILTER.starts_with("cost_scout"));
}
