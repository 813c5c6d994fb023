//! Relay message types.
//!
//! Every message on the wire is a JSON object discriminated by its `type`
//! field. Each kind is a separate variant carrying only its own fields, so a
//! `clear` message can never carry a `priority` and a `typing` message can
//! never carry a `clearScope`.
//!
//! # Wire Shape
//!
//! ```text
//! {"type":"typing","text":"","timestamp":1700000000000,"isIncremental":true}
//! {"type":"message","text":"hi","timestamp":1700000000000,"priority":"normal"}
//! {"type":"clear","text":"","timestamp":1700000000000,"clearScope":"typing"}
//! {"type":"connection-established","timestamp":1700000000000}
//! ```
//!
//! Absent optional fields are omitted on encode, never written as `null`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fields shared by every chat-level message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBase {
    /// Message text. Empty for signals such as typing and clear.
    #[serde(default)]
    pub text: String,

    /// Milliseconds since the Unix epoch. `None` lets the server assign it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,

    /// Optional session tracking identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl MessageBase {
    /// Base with the given text, stamped at `now_ms`.
    pub fn new(text: impl Into<String>, now_ms: u64) -> Self {
        Self { text: text.into(), timestamp: Some(now_ms), session_id: None }
    }
}

/// Counterpart is composing a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingMessage {
    /// Shared fields.
    #[serde(flatten)]
    pub base: MessageBase,

    /// Replaces, rather than appends to, any outstanding typing state.
    #[serde(default)]
    pub is_incremental: bool,
}

/// Message priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Background traffic.
    Low,
    /// Regular chat message.
    #[default]
    Normal,
    /// Urgent message.
    High,
}

/// A real chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Shared fields.
    #[serde(flatten)]
    pub base: MessageBase,

    /// Priority level, `normal` when absent.
    #[serde(default)]
    pub priority: Priority,
}

/// A command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandMessage {
    /// Shared fields.
    #[serde(flatten)]
    pub base: MessageBase,

    /// The command being executed.
    pub command: String,

    /// Command arguments, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

/// What a clear message removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearScope {
    /// Everything in the message log.
    All,
    /// Typing indicators only.
    #[default]
    Typing,
    /// Session-scoped state. Treated like `Typing` by the client.
    Session,
    /// Scope string this client does not recognise. Treated like `Typing`.
    #[serde(other)]
    Unknown,
}

/// Clears typing state or the whole log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearMessage {
    /// Shared fields. `text` is always empty.
    #[serde(flatten)]
    pub base: MessageBase,

    /// Scope of the clear. `typing` when absent.
    #[serde(default)]
    pub clear_scope: ClearScope,
}

/// An error report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    /// Shared fields.
    #[serde(flatten)]
    pub base: MessageBase,

    /// Optional error classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// Whether the failed action can be retried.
    #[serde(default)]
    pub retryable: bool,
}

/// Lifecycle signal sent by the server when a stream opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEstablished {
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// A message whose `type` this client does not recognise.
///
/// Kept so the conversation still shows it, as `[type]` when it has no
/// text. Decoding refuses the names of known kinds, so a malformed known
/// message is still an error rather than an `OtherMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OtherRepr")]
pub struct OtherMessage {
    /// Wire `type` value.
    #[serde(rename = "type")]
    pub kind: String,

    /// Shared fields.
    #[serde(flatten)]
    pub base: MessageBase,
}

#[derive(Deserialize)]
struct OtherRepr {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    base: MessageBase,
}

impl TryFrom<OtherRepr> for OtherMessage {
    type Error = String;

    fn try_from(repr: OtherRepr) -> std::result::Result<Self, Self::Error> {
        if KNOWN_KINDS.iter().any(|kind| kind.as_str() == repr.kind) {
            return Err(format!("malformed `{}` message", repr.kind));
        }
        Ok(Self { kind: repr.kind, base: repr.base })
    }
}

const KNOWN_KINDS: [MessageKind; 6] = [
    MessageKind::Typing,
    MessageKind::Message,
    MessageKind::Command,
    MessageKind::Clear,
    MessageKind::Error,
    MessageKind::ConnectionEstablished,
];

/// Message kind, independent of payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// See [`TypingMessage`].
    Typing,
    /// See [`ChatMessage`].
    Message,
    /// See [`CommandMessage`].
    Command,
    /// See [`ClearMessage`].
    Clear,
    /// See [`ErrorMessage`].
    Error,
    /// See [`ConnectionEstablished`].
    ConnectionEstablished,
    /// See [`OtherMessage`].
    Other,
}

impl MessageKind {
    /// Wire name of the kind (the `type` field).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::Message => "message",
            Self::Command => "command",
            Self::Clear => "clear",
            Self::Error => "error",
            Self::ConnectionEstablished => "connection-established",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message sent by this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundMessage {
    /// Typing indicator.
    Typing(TypingMessage),
    /// Chat message.
    Message(ChatMessage),
    /// Command invocation.
    Command(CommandMessage),
    /// Clear request.
    Clear(ClearMessage),
    /// Error report.
    Error(ErrorMessage),
}

impl OutboundMessage {
    /// Incremental typing indicator with empty text.
    ///
    /// Only the signal matters; partial input is never sent.
    pub fn typing(now_ms: u64) -> Self {
        Self::Typing(TypingMessage { base: MessageBase::new("", now_ms), is_incremental: true })
    }

    /// Chat message with normal priority.
    pub fn message(text: impl Into<String>, now_ms: u64) -> Self {
        Self::Message(ChatMessage { base: MessageBase::new(text, now_ms), priority: Priority::Normal })
    }

    /// Command whose name is `command` and whose text mirrors it.
    pub fn command(command: impl Into<String>, args: Option<Vec<String>>, now_ms: u64) -> Self {
        let command = command.into();
        Self::Command(CommandMessage { base: MessageBase::new(command.clone(), now_ms), command, args })
    }

    /// Clear with the given scope. Text is always empty.
    pub fn clear(clear_scope: ClearScope, now_ms: u64) -> Self {
        Self::Clear(ClearMessage { base: MessageBase::new("", now_ms), clear_scope })
    }

    /// Retryable error report.
    pub fn error(text: impl Into<String>, error_code: Option<String>, now_ms: u64) -> Self {
        Self::Error(ErrorMessage { base: MessageBase::new(text, now_ms), error_code, retryable: true })
    }

    /// Kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Typing(_) => MessageKind::Typing,
            Self::Message(_) => MessageKind::Message,
            Self::Command(_) => MessageKind::Command,
            Self::Clear(_) => MessageKind::Clear,
            Self::Error(_) => MessageKind::Error,
        }
    }

    /// Shared fields.
    pub fn base(&self) -> &MessageBase {
        match self {
            Self::Typing(m) => &m.base,
            Self::Message(m) => &m.base,
            Self::Command(m) => &m.base,
            Self::Clear(m) => &m.base,
            Self::Error(m) => &m.base,
        }
    }

    /// Attach a session identifier.
    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        let base = match &mut self {
            Self::Typing(m) => &mut m.base,
            Self::Message(m) => &mut m.base,
            Self::Command(m) => &mut m.base,
            Self::Clear(m) => &mut m.base,
            Self::Error(m) => &mut m.base,
        };
        base.session_id = Some(session_id.into());
        self
    }
}

/// A message received from the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundMessage {
    /// Typing indicator.
    Typing(TypingMessage),
    /// Chat message.
    Message(ChatMessage),
    /// Command invocation.
    Command(CommandMessage),
    /// Clear request.
    Clear(ClearMessage),
    /// Error report.
    Error(ErrorMessage),
    /// Stream opened. Status signal, never displayed as chat content.
    ConnectionEstablished(ConnectionEstablished),
    /// Any other `type`. Must stay last: it is tried only after every
    /// tagged variant fails.
    #[serde(untagged)]
    Other(OtherMessage),
}

impl InboundMessage {
    /// Kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Typing(_) => MessageKind::Typing,
            Self::Message(_) => MessageKind::Message,
            Self::Command(_) => MessageKind::Command,
            Self::Clear(_) => MessageKind::Clear,
            Self::Error(_) => MessageKind::Error,
            Self::ConnectionEstablished(_) => MessageKind::ConnectionEstablished,
            Self::Other(_) => MessageKind::Other,
        }
    }

    /// Wire `type` value, including unrecognised ones.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Other(m) => &m.kind,
            other => other.kind().as_str(),
        }
    }

    /// Shared fields. `None` for `connection-established`.
    pub fn base(&self) -> Option<&MessageBase> {
        match self {
            Self::Typing(m) => Some(&m.base),
            Self::Message(m) => Some(&m.base),
            Self::Command(m) => Some(&m.base),
            Self::Clear(m) => Some(&m.base),
            Self::Error(m) => Some(&m.base),
            Self::Other(m) => Some(&m.base),
            Self::ConnectionEstablished(_) => None,
        }
    }

    /// Message text. Empty for `connection-established`.
    pub fn text(&self) -> &str {
        self.base().map_or("", |base| base.text.as_str())
    }

    /// Timestamp, if the sender supplied one.
    pub fn timestamp(&self) -> Option<u64> {
        match self {
            Self::ConnectionEstablished(m) => m.timestamp,
            other => other.base().and_then(|base| base.timestamp),
        }
    }

    /// True for typing indicators.
    pub fn is_typing(&self) -> bool {
        matches!(self, Self::Typing(_))
    }

    /// Synthetic retryable error, used to surface local failures in the log.
    pub fn local_error(text: impl Into<String>, now_ms: u64) -> Self {
        Self::Error(ErrorMessage {
            base: MessageBase::new(text, now_ms),
            error_code: None,
            retryable: true,
        })
    }
}

impl From<OutboundMessage> for InboundMessage {
    fn from(message: OutboundMessage) -> Self {
        match message {
            OutboundMessage::Typing(m) => Self::Typing(m),
            OutboundMessage::Message(m) => Self::Message(m),
            OutboundMessage::Command(m) => Self::Command(m),
            OutboundMessage::Clear(m) => Self::Clear(m),
            OutboundMessage::Error(m) => Self::Error(m),
        }
    }
}
