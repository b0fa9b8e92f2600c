//! Test subscriber for the engine's `tracing` events.
//!
//! The library crates only emit events; embedding applications install their
//! own subscriber.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a debug-level subscriber that writes through the test harness.
///
/// Safe to call from every test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
