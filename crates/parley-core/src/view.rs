//! Unified conversation view.
//!
//! Merges the inbound [`MessageLog`] with locally sent messages into one
//! chronological list for rendering. The view is rebuilt from scratch on every
//! state change; both inputs are bounded, so there is nothing to gain from
//! incremental diffing.

use std::borrow::Cow;

use parley_proto::{InboundMessage, MessageKind};

use crate::{MessageLog, SentMessage};

/// Entries returned by [`build`].
pub const MAX_DISPLAY_MESSAGES: usize = 15;

/// Who a displayed message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageSender {
    /// This client.
    Cli,
    /// The remote web peer.
    Web,
    /// Connection lifecycle and errors.
    System,
}

impl MessageSender {
    /// Lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Web => "web",
            Self::System => "system",
        }
    }
}

/// Content of a unified message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifiedBody {
    /// Received from the stream.
    Inbound(InboundMessage),
    /// Sent by this client.
    Local {
        /// Trimmed text as submitted.
        text: String,
    },
}

/// Render-ready message with sender and resolved timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedMessage {
    /// Origin of the message.
    pub sender: MessageSender,
    /// Milliseconds since the Unix epoch. Always present.
    pub timestamp: u64,
    /// Message content.
    pub body: UnifiedBody,
}

impl UnifiedMessage {
    /// Message kind. Local sends are always `message`.
    pub fn kind(&self) -> MessageKind {
        match &self.body {
            UnifiedBody::Inbound(message) => message.kind(),
            UnifiedBody::Local { .. } => MessageKind::Message,
        }
    }

    /// Raw message text.
    pub fn text(&self) -> &str {
        match &self.body {
            UnifiedBody::Inbound(message) => message.text(),
            UnifiedBody::Local { text } => text,
        }
    }

    /// True for typing indicators.
    pub fn is_typing(&self) -> bool {
        self.kind() == MessageKind::Typing
    }

    /// Wire `type` of the message. Local sends are always `message`.
    pub fn type_name(&self) -> &str {
        match &self.body {
            UnifiedBody::Inbound(message) => message.type_name(),
            UnifiedBody::Local { .. } => MessageKind::Message.as_str(),
        }
    }

    /// Text to show for this message.
    ///
    /// Empty texts fall back to `[type]` so signals remain visible.
    pub fn display_text(&self) -> Cow<'_, str> {
        if self.kind() == MessageKind::ConnectionEstablished {
            return Cow::Borrowed("Connected to web stream");
        }
        match self.text() {
            "" => Cow::Owned(format!("[{}]", self.type_name())),
            text => Cow::Borrowed(text),
        }
    }
}

/// Sender attributed to an inbound message.
pub fn sender_of(message: &InboundMessage) -> MessageSender {
    match message.kind() {
        MessageKind::ConnectionEstablished | MessageKind::Error => MessageSender::System,
        MessageKind::Typing
        | MessageKind::Message
        | MessageKind::Command
        | MessageKind::Clear
        | MessageKind::Other => MessageSender::Web,
    }
}

/// Build the display list from the inbound log and local sends.
///
/// Drops `connection-established` entries, stamps inbound messages lacking a
/// timestamp with `now_ms`, sorts stably by timestamp (inbound before local on
/// ties), and keeps the last [`MAX_DISPLAY_MESSAGES`].
pub fn build(log: &MessageLog, sent: &[SentMessage], now_ms: u64) -> Vec<UnifiedMessage> {
    let inbound = log
        .iter()
        .filter(|m| m.kind() != MessageKind::ConnectionEstablished)
        .map(|m| UnifiedMessage {
            sender: sender_of(m),
            timestamp: m.timestamp().unwrap_or(now_ms),
            body: UnifiedBody::Inbound(m.clone()),
        });

    let local = sent.iter().map(|m| UnifiedMessage {
        sender: MessageSender::Cli,
        timestamp: m.timestamp,
        body: UnifiedBody::Local { text: m.text.clone() },
    });

    let mut messages: Vec<UnifiedMessage> = inbound.chain(local).collect();
    messages.sort_by_key(|m| m.timestamp);

    let excess = messages.len().saturating_sub(MAX_DISPLAY_MESSAGES);
    messages.drain(..excess);
    messages
}
