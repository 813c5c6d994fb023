//! Application side-effects.
//!
//! This module defines the [`AppAction`] enum, the instructions produced by
//! the [`crate::App`] state machine for the runtime to execute.

use std::time::Duration;

use parley_proto::OutboundMessage;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Queue a message for the outbound sender.
    Send(OutboundMessage),

    /// (Re)start the single typing timer. Replaces any pending deadline.
    ArmTypingTimer(Duration),

    /// Stop the typing timer.
    CancelTypingTimer,
}
