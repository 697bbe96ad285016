//! Tracing subscriber initialization.
//!
//! Rollups log one `info` line per run (tagged with its run id), `debug` per
//! buffer and `warn` for skipped buffers and flagged rows.

use tracing_subscriber::EnvFilter;

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// JSON logs with timestamps, filtered by `RUST_LOG` (default `info`).
pub fn init() {
    init_with_filter("info");
}

/// Like [`init`], with an explicit fallback filter when `RUST_LOG` is unset.
pub fn init_with_filter(default_directive: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Compact human-readable output captured by the test harness.
///
/// Defaults to `warn` so flagged rows and skipped buffers show up in failing tests.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("warn"))
        .compact()
        .with_test_writer()
        .try_init();
}
