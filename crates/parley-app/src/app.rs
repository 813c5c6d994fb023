//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns everything the
//! terminal shows and is decoupled from I/O. It consumes [`AppEvent`]s with
//! the current wall-clock time and produces [`AppAction`]s for the runtime.
//!
//! # Responsibilities
//!
//! - Folds inbound messages into the [`MessageLog`] and tracks local sends.
//! - Drives the [`TypingIndicator`] from input edits, submit and timer expiry.
//! - Tracks connection status and a transient status line.
//! - Advances the typing animation while a remote indicator is visible.

use std::time::Duration;

use parley_core::{
    ConnectionStatus, MessageLog, SentLog, TypingAction, TypingAnimation, TypingIndicator,
    UnifiedMessage, typing::DEFAULT_TYPING_TIMEOUT, view,
};
use parley_proto::InboundMessage;

use crate::{AppAction, AppEvent, InputState, KeyInput};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies.
#[derive(Debug, Clone)]
pub struct App {
    /// Stream connection status.
    status: ConnectionStatus,
    /// Inbound messages, folded by the reducer.
    log: MessageLog,
    /// Messages this client sent.
    sent: SentLog,
    /// Outbound typing indicator.
    typing: TypingIndicator,
    /// Input line.
    input: InputState,
    /// Remote typing animation frame.
    animation: TypingAnimation,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_TIMEOUT)
    }
}

impl App {
    /// Create a disconnected App whose typing indicator clears after
    /// `typing_timeout`.
    pub fn new(typing_timeout: Duration) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            log: MessageLog::new(),
            sent: SentLog::new(),
            typing: TypingIndicator::new(typing_timeout),
            input: InputState::new(),
            animation: TypingAnimation::new(),
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event at `now_ms` and return actions for the runtime.
    pub fn handle(&mut self, event: AppEvent, now_ms: u64) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key, now_ms),
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Connecting => {
                self.status = ConnectionStatus::Connecting;
                self.status_message = None;
                vec![AppAction::Render]
            },
            AppEvent::Connected => {
                self.status = ConnectionStatus::Connected;
                self.status_message = None;
                vec![AppAction::Render]
            },
            AppEvent::Disconnected => {
                self.status = ConnectionStatus::Disconnected;
                vec![AppAction::Render]
            },
            AppEvent::Reconnecting { attempt, delay } => {
                self.status = ConnectionStatus::Connecting;
                self.status_message =
                    Some(format!("Reconnecting in {:.1}s (attempt {attempt})", delay.as_secs_f64()));
                vec![AppAction::Render]
            },
            AppEvent::StreamFailed { message } => {
                tracing::warn!(error = %message, "stream failed");
                self.status = ConnectionStatus::Error;
                self.reduce(InboundMessage::local_error(format!("Connection error: {message}"), now_ms));
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
            AppEvent::MessageReceived(message) => {
                self.reduce(message);
                vec![AppAction::Render]
            },
            AppEvent::TypingTimeout => {
                let actions = self.typing.handle_timer_expired(now_ms);
                self.apply_typing(actions)
            },
            AppEvent::AnimationTick => {
                if self.messages(now_ms).iter().any(UnifiedMessage::is_typing) {
                    self.animation.advance();
                    vec![AppAction::Render]
                } else {
                    self.animation.reset();
                    vec![]
                }
            },
        }
    }

    /// Withdraw any outstanding typing indicator and stop the typing timer.
    ///
    /// Called on quit, before the stream is disconnected.
    pub fn shutdown(&mut self, now_ms: u64) -> Vec<AppAction> {
        let actions = self.typing.cleanup(now_ms);
        self.apply_typing(actions)
    }

    fn handle_key(&mut self, key: KeyInput, now_ms: u64) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                self.input.insert(c);
                self.input_changed(now_ms)
            },
            KeyInput::Backspace => {
                if self.input.backspace() {
                    self.input_changed(now_ms)
                } else {
                    vec![]
                }
            },
            KeyInput::Delete => {
                if self.input.delete() {
                    self.input_changed(now_ms)
                } else {
                    vec![]
                }
            },
            KeyInput::Left => {
                self.input.move_left();
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                self.input.move_right();
                vec![AppAction::Render]
            },
            KeyInput::Home => {
                self.input.home();
                vec![AppAction::Render]
            },
            KeyInput::End => {
                self.input.end();
                vec![AppAction::Render]
            },
            KeyInput::Enter => {
                let text = self.input.take();
                let actions = self.typing.handle_message_submit(&text, now_ms);
                self.apply_typing(actions)
            },
            KeyInput::Esc => {
                let mut actions = self.shutdown(now_ms);
                actions.push(AppAction::Quit);
                actions
            },
            KeyInput::Tab | KeyInput::Up | KeyInput::Down => vec![],
        }
    }

    fn input_changed(&mut self, now_ms: u64) -> Vec<AppAction> {
        let actions = self.typing.handle_input_change(self.input.buffer(), now_ms);
        self.apply_typing(actions)
    }

    /// Translate typing actions, recording local sends. Always ends with a
    /// single render.
    fn apply_typing(&mut self, actions: Vec<TypingAction>) -> Vec<AppAction> {
        let mut out = Vec::with_capacity(actions.len() + 1);
        for action in actions {
            match action {
                TypingAction::Send(message) => out.push(AppAction::Send(message)),
                TypingAction::ArmTimer(timeout) => out.push(AppAction::ArmTypingTimer(timeout)),
                TypingAction::CancelTimer => out.push(AppAction::CancelTypingTimer),
                TypingAction::MessageSent(message) => self.sent.push(message),
                TypingAction::StateChanged { indicator_sent } => {
                    tracing::debug!(indicator_sent, "typing indicator changed");
                },
            }
        }
        out.push(AppAction::Render);
        out
    }

    fn reduce(&mut self, message: InboundMessage) {
        self.log = std::mem::take(&mut self.log).apply(message);
    }

    /// Current connection status.
    pub fn connection_status(&self) -> ConnectionStatus {
        self.status
    }

    /// True iff the stream is connected.
    pub fn is_listening(&self) -> bool {
        self.status.is_listening()
    }

    /// Render-ready conversation, oldest first.
    pub fn messages(&self, now_ms: u64) -> Vec<UnifiedMessage> {
        view::build(&self.log, self.sent.entries(), now_ms)
    }

    /// Inbound message log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Messages this client sent.
    pub fn sent(&self) -> &SentLog {
        &self.sent
    }

    /// Current typing animation frame index.
    pub fn typing_animation_frame(&self) -> usize {
        self.animation.frame()
    }

    /// Dots for the current typing animation frame.
    pub fn typing_dots(&self) -> &'static str {
        self.animation.dots()
    }

    /// Input line.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// True while this client's typing indicator is outstanding.
    pub fn typing_indicator_sent(&self) -> bool {
        self.typing.typing_state().is_indicator_sent
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use parley_proto::{ClearScope, MessageKind, OutboundMessage};

    use super::*;

    fn type_text(app: &mut App, text: &str, now_ms: u64) -> Vec<AppAction> {
        text.chars().flat_map(|c| app.handle(AppEvent::Key(KeyInput::Char(c)), now_ms)).collect()
    }

    fn sends(actions: &[AppAction]) -> Vec<MessageKind> {
        actions
            .iter()
            .filter_map(|a| match a {
                AppAction::Send(m) => Some(m.kind()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_char_sends_typing() {
        let mut app = App::default();
        let actions = app.handle(AppEvent::Key(KeyInput::Char('h')), 10);

        assert!(matches!(actions.as_slice(), [
            AppAction::Send(OutboundMessage::Typing(_)),
            AppAction::ArmTypingTimer(_),
            AppAction::Render
        ]));
        assert!(app.typing_indicator_sent());
    }

    #[test]
    fn cursor_keys_do_not_touch_typing() {
        let mut app = App::default();
        type_text(&mut app, "ab", 1);

        let actions = app.handle(AppEvent::Key(KeyInput::Left), 2);

        assert_eq!(actions, [AppAction::Render]);
    }

    #[test]
    fn backspace_to_empty_clears() {
        let mut app = App::default();
        type_text(&mut app, "a", 1);

        let actions = app.handle(AppEvent::Key(KeyInput::Backspace), 2);

        assert_eq!(sends(&actions), [MessageKind::Clear]);
        assert!(actions.contains(&AppAction::CancelTypingTimer));
        assert!(!app.typing_indicator_sent());
    }

    #[test]
    fn enter_submits_and_clears_input() {
        let mut app = App::default();
        type_text(&mut app, "hi", 1);

        let actions = app.handle(AppEvent::Key(KeyInput::Enter), 5);

        assert_eq!(sends(&actions), [MessageKind::Clear, MessageKind::Message]);
        assert!(app.input().is_empty());
        assert_eq!(app.sent().len(), 1);

        let view = app.messages(10);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].text(), "hi");
        assert_eq!(view[0].sender, parley_core::MessageSender::Cli);
    }

    #[test]
    fn enter_on_blank_input_only_clears_buffer() {
        let mut app = App::default();
        type_text(&mut app, "  ", 1);

        let actions = app.handle(AppEvent::Key(KeyInput::Enter), 2);

        assert!(sends(&actions).is_empty());
        assert!(app.input().is_empty());
    }

    #[test]
    fn esc_withdraws_indicator_and_quits() {
        let mut app = App::default();
        type_text(&mut app, "x", 1);

        let actions = app.handle(AppEvent::Key(KeyInput::Esc), 2);

        assert_eq!(sends(&actions), [MessageKind::Clear]);
        assert_eq!(actions.last(), Some(&AppAction::Quit));
    }

    #[test]
    fn typing_timeout_clears() {
        let mut app = App::default();
        type_text(&mut app, "x", 1);

        let actions = app.handle(AppEvent::TypingTimeout, 2001);

        assert!(matches!(actions.as_slice(), [
            AppAction::Send(OutboundMessage::Clear(c)),
            AppAction::Render
        ] if c.clear_scope == ClearScope::Typing));
    }

    #[test]
    fn stream_failure_sets_error_and_logs() {
        let mut app = App::default();
        app.handle(AppEvent::Connected, 0);
        app.handle(AppEvent::Disconnected, 1);
        app.handle(AppEvent::StreamFailed { message: "HTTP 500".into() }, 2);

        assert_eq!(app.connection_status(), ConnectionStatus::Error);
        assert!(!app.is_listening());

        let view = app.messages(3);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].kind(), MessageKind::Error);
        assert_eq!(view[0].text(), "Connection error: HTTP 500");
        assert_eq!(view[0].sender, parley_core::MessageSender::System);
    }

    #[test]
    fn reconnecting_shows_connecting() {
        let mut app = App::default();
        app.handle(AppEvent::Reconnecting { attempt: 2, delay: Duration::from_millis(2000) }, 0);

        assert_eq!(app.connection_status(), ConnectionStatus::Connecting);
        assert_eq!(app.status_message(), Some("Reconnecting in 2.0s (attempt 2)"));
    }

    #[test]
    fn animation_runs_only_while_remote_typing() {
        let mut app = App::default();
        assert!(app.handle(AppEvent::AnimationTick, 0).is_empty());

        app.handle(AppEvent::MessageReceived(InboundMessage::from(OutboundMessage::typing(1))), 1);
        app.handle(AppEvent::AnimationTick, 2);
        assert_eq!(app.typing_animation_frame(), 1);

        app.handle(AppEvent::MessageReceived(InboundMessage::from(OutboundMessage::message("done", 3))), 3);
        app.handle(AppEvent::AnimationTick, 4);
        assert_eq!(app.typing_animation_frame(), 0);
    }

    #[test]
    fn resize_is_tracked() {
        let mut app = App::default();
        assert_eq!(app.handle(AppEvent::Resize(120, 40), 0), [AppAction::Render]);
        assert_eq!(app.terminal_size(), (120, 40));
    }
}
