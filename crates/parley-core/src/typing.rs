//! Outbound typing indicator state machine.
//!
//! Sequences the `typing`, `clear` and `message` sends that accompany local
//! editing. Uses the action pattern: methods take the current time and return
//! [`TypingAction`]s for the driver to execute. The driver owns the single
//! timer slot; the state machine only tracks whether it believes a timer is
//! pending.
//!
//! # State Machine
//!
//! ```text
//!            non-empty input
//! ┌──────┐  (send typing)   ┌────────────┐
//! │ Idle │─────────────────>│ TypingSent │──┐ non-empty input
//! └──────┘                  └────────────┘<─┘ (re-arm timer)
//!     ^                           │
//!     │  empty input / timer /    │
//!     │  submit / cleanup         │
//!     └───────(send clear)────────┘
//! ```
//!
//! # Invariants
//!
//! - Single Timer: at most one timer is pending; arming always follows a
//!   cancel of any previous timer.
//! - Paired Clear: a `clear{typing}` is only sent while an indicator is
//!   outstanding, so every clear is preceded by exactly one `typing`.
//! - Send failures never roll back a transition. The driver does not report
//!   them back.

use std::time::Duration;

use parley_proto::{ClearScope, OutboundMessage};

use crate::SentMessage;

/// Idle time after the last keystroke before the indicator is cleared.
pub const DEFAULT_TYPING_TIMEOUT: Duration = Duration::from_millis(2000);

/// Indicator state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypingState {
    /// No indicator outstanding.
    #[default]
    Idle,
    /// A `typing` message was sent and not yet cleared.
    TypingSent,
}

/// Actions returned by the typing state machine.
///
/// The driver executes these in order:
/// - `Send`: hand the message to the outbound sender
/// - `ArmTimer`: (re)start the single typing timer
/// - `CancelTimer`: stop the typing timer
/// - `StateChanged`: notify observers that the indicator flag flipped
/// - `MessageSent`: record a submitted message for local display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingAction {
    /// Send this message to the relay.
    Send(OutboundMessage),
    /// Start the typing timer with this duration.
    ArmTimer(Duration),
    /// Stop the pending typing timer.
    CancelTimer,
    /// The indicator flag changed.
    StateChanged {
        /// True if an indicator is now outstanding.
        indicator_sent: bool,
    },
    /// A message was submitted locally.
    MessageSent(SentMessage),
}

/// Observable state for renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypingSnapshot {
    /// True while an indicator is outstanding.
    pub is_indicator_sent: bool,
    /// True while the clear timer is pending.
    pub has_timeout: bool,
}

/// Typing indicator state machine.
///
/// Pure: no I/O, no clock. Time is passed to every method that stamps a
/// message.
#[derive(Debug, Clone)]
pub struct TypingIndicator {
    state: TypingState,
    timer_pending: bool,
    timeout: Duration,
}

impl Default for TypingIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_TIMEOUT)
    }
}

impl TypingIndicator {
    /// Idle indicator that clears after `timeout` of inactivity.
    pub fn new(timeout: Duration) -> Self {
        Self { state: TypingState::Idle, timer_pending: false, timeout }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TypingState {
        self.state
    }

    /// Inactivity timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Snapshot for renderers.
    #[must_use]
    pub fn typing_state(&self) -> TypingSnapshot {
        TypingSnapshot {
            is_indicator_sent: self.state == TypingState::TypingSent,
            has_timeout: self.timer_pending,
        }
    }

    /// The input buffer now holds `value`.
    ///
    /// Blank input clears any outstanding indicator and leaves no timer.
    /// Anything else sends `typing` on the first keystroke and re-arms the
    /// timer.
    pub fn handle_input_change(&mut self, value: &str, now_ms: u64) -> Vec<TypingAction> {
        let mut actions = self.cancel_timer();

        if value.trim().is_empty() {
            actions.extend(self.clear_indicator(now_ms));
            return actions;
        }

        if self.state == TypingState::Idle {
            self.state = TypingState::TypingSent;
            actions.push(TypingAction::Send(OutboundMessage::typing(now_ms)));
            actions.push(TypingAction::StateChanged { indicator_sent: true });
        }

        self.timer_pending = true;
        actions.push(TypingAction::ArmTimer(self.timeout));
        actions
    }

    /// The typing timer fired.
    ///
    /// Ignored unless a timer is pending, so a stale expiry delivered after a
    /// cancel has no effect.
    pub fn handle_timer_expired(&mut self, now_ms: u64) -> Vec<TypingAction> {
        if !self.timer_pending {
            tracing::trace!("ignoring stale typing timer");
            return vec![];
        }

        self.timer_pending = false;
        self.clear_indicator(now_ms)
    }

    /// The user submitted `text`.
    ///
    /// Blank text is ignored. Otherwise the indicator is cleared, the trimmed
    /// text is recorded and the original text is sent as a chat message.
    pub fn handle_message_submit(&mut self, text: &str, now_ms: u64) -> Vec<TypingAction> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return vec![];
        }

        let mut actions = self.cancel_timer();
        actions.extend(self.clear_indicator(now_ms));
        actions.push(TypingAction::MessageSent(SentMessage {
            text: trimmed.to_string(),
            timestamp: now_ms,
        }));
        actions.push(TypingAction::Send(OutboundMessage::message(text, now_ms)));
        actions
    }

    /// Tear down: cancel the timer and withdraw any outstanding indicator.
    pub fn cleanup(&mut self, now_ms: u64) -> Vec<TypingAction> {
        let mut actions = self.cancel_timer();
        actions.extend(self.clear_indicator(now_ms));
        actions
    }

    fn cancel_timer(&mut self) -> Vec<TypingAction> {
        if std::mem::take(&mut self.timer_pending) { vec![TypingAction::CancelTimer] } else { vec![] }
    }

    fn clear_indicator(&mut self, now_ms: u64) -> Vec<TypingAction> {
        if self.state != TypingState::TypingSent {
            return vec![];
        }

        self.state = TypingState::Idle;
        vec![
            TypingAction::Send(OutboundMessage::clear(ClearScope::Typing, now_ms)),
            TypingAction::StateChanged { indicator_sent: false },
        ]
    }
}
