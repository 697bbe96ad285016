//! Process-wide logging setup shared by binaries, tests and benches.

/// Install the JSON subscriber (filter from `RUST_LOG`, default `info`).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber setup (filters, formats).
pub mod tracing;

pub use self::tracing::{init_test, init_with_filter};
