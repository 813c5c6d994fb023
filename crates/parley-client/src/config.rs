//! Client tunables.

use std::time::Duration;

use parley_core::{ReconnectPolicy, animation, typing};

/// Bounded capacity for event and outbound channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Time allowed for one outbound POST, response body included.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Time allowed to drain the outbound queue on shutdown.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Stream reconnect schedule
    pub reconnect: ReconnectPolicy,
    /// Inactivity before the typing indicator is cleared
    pub typing_timeout: Duration,
    /// Typing animation frame interval
    pub animation_interval: Duration,
    /// Capacity of the stream event and outbound channels
    pub channel_capacity: usize,
    /// Per-message POST deadline; a hung send cannot stall the queue
    pub send_timeout: Duration,
    /// Shutdown budget for delivering queued messages
    pub flush_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            reconnect: ReconnectPolicy::default(),
            typing_timeout: typing::DEFAULT_TYPING_TIMEOUT,
            animation_interval: animation::FRAME_INTERVAL,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
        }
    }
}
