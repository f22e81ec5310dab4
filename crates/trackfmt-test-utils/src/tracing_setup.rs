//! Tracing initialisation for tests.
//!
//! The subscriber is installed at most once per process, so
//! [`init_test_tracing`] can be called from every test function.

use tracing_subscriber::EnvFilter;

/// Install a subscriber that writes through the test harness and honours
/// `RUST_LOG` (default `debug`, so engine diagnostics show on failure).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
