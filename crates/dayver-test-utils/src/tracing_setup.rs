//! Tracing helpers for tests.
//!
//! [`init_test_tracing`] routes events to the test-harness writer.
//! [`capture_events`] runs a closure under a thread-local subscriber and
//! returns what it logged, for tests that check which diagnostics were
//! surfaced.

use dayver_core::logging::EventCapture;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

/// Initialise a tracing subscriber that writes to the test-harness writer
/// and respects the `RUST_LOG` environment variable.
///
/// Safe to call multiple times; subsequent calls are silently ignored.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Run `f` with an [`EventCapture`] installed as the thread's default
/// subscriber, returning `f`'s result and the capture.
pub fn capture_events<T>(f: impl FnOnce() -> T) -> (T, EventCapture) {
    let capture = EventCapture::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture)
}
