//! Production environment using the system clock and tokio timers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parley_core::Environment;

/// Production environment.
///
/// Wall-clock milliseconds from `SystemTime`, sleeps from `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::disallowed_methods)]
    fn now_ms(&self) -> u64 {
        // A clock before 1970 is treated as the epoch.
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis() as u64)
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
