//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: scheduler and pricing events at info.
pub const DEFAULT_FILTER: &str = "cost_scout=info";

/// Initialize tracing with [`DEFAULT_FILTER`] as the fallback filter.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_FILTER);
}

/// Install an env-filtered fmt subscriber unless one is already set.
///
/// `RUST_LOG` wins when present; otherwise `default_filter` is used.
pub fn init_tracing_with(default_filter: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
