//! Application input events.
//!
//! This module defines [`AppEvent`], the full set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from three sources:
//! - User interaction (keys, resize).
//! - Stream notifications translated from the stream client.
//! - Timers owned by the runtime (typing deadline, animation ticks).

use std::time::Duration;

use parley_proto::InboundMessage;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Stream connection in progress.
    Connecting,

    /// Stream connected.
    Connected,

    /// Stream attempt ended.
    Disconnected,

    /// Waiting to retry the stream.
    Reconnecting {
        /// 1-based retry number.
        attempt: u32,
        /// Wait before the retry.
        delay: Duration,
    },

    /// Stream retries exhausted.
    StreamFailed {
        /// Error description.
        message: String,
    },

    /// Message parsed from the stream.
    MessageReceived(InboundMessage),

    /// The typing timer armed by [`crate::AppAction::ArmTypingTimer`] fired.
    TypingTimeout,

    /// Typing animation frame tick.
    AnimationTick,
}
