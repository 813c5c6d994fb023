//! Environment abstraction for deterministic testing.
//!
//! Decouples drivers from system resources (wall clock, timers). Production
//! uses the real clock and tokio sleeps; tests substitute a recording
//! environment whose sleeps complete immediately, so backoff schedules can be
//! asserted without waiting for them.

use std::time::Duration;

/// Abstract environment providing time and async sleep.
///
/// Only drivers use this trait. State machines take `now_ms` as a plain
/// argument instead.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Wall-clock time in milliseconds since the Unix epoch.
    ///
    /// Message timestamps are compared across machines, so this is wall time,
    /// not a monotonic instant.
    fn now_ms(&self) -> u64;

    /// Sleeps for the specified duration.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}
