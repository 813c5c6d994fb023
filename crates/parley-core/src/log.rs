//! Bounded message logs.
//!
//! [`MessageLog`] holds inbound messages for one connection lifetime. It is
//! only ever replaced by [`MessageLog::apply`], which consumes the previous log
//! and returns the next one; nothing mutates a log that another reader holds.
//!
//! # Reducer Rules
//!
//! Evaluated in order, first match wins:
//!
//! 1. `clear`: scope `all` empties the log; any other scope removes typing
//!    entries.
//! 2. `typing`: remove existing typing entries, append.
//! 3. `message`: remove existing typing entries, append.
//! 4. anything else: append.
//!
//! Appends keep the most recent [`MAX_STORED_MESSAGES`] entries.
//!
//! # Invariants
//!
//! - Bounded: `len() <= MAX_STORED_MESSAGES` after every update.
//! - Single Indicator: at most one `typing` entry is present.

use parley_proto::{ClearScope, InboundMessage};

/// Inbound messages retained after each update.
pub const MAX_STORED_MESSAGES: usize = 19;

/// Locally sent messages retained for display.
pub const MAX_SENT_MESSAGES: usize = 19;

/// Ordered, bounded log of inbound messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    entries: Vec<InboundMessage>,
}

impl MessageLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one inbound message into the log.
    #[must_use]
    pub fn apply(self, message: InboundMessage) -> Self {
        let entries = match message {
            InboundMessage::Clear(clear) => match clear.clear_scope {
                ClearScope::All => Vec::new(),
                ClearScope::Typing | ClearScope::Session | ClearScope::Unknown => {
                    without_typing(self.entries)
                },
            },
            message @ (InboundMessage::Typing(_) | InboundMessage::Message(_)) => {
                append_capped(without_typing(self.entries), message)
            },
            message @ (InboundMessage::Command(_)
            | InboundMessage::Error(_)
            | InboundMessage::ConnectionEstablished(_)
            | InboundMessage::Other(_)) => append_capped(self.entries, message),
        };

        Self { entries }
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[InboundMessage] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &InboundMessage> {
        self.entries.iter()
    }

    /// True if a typing indicator is live.
    pub fn has_typing(&self) -> bool {
        self.entries.iter().any(InboundMessage::is_typing)
    }
}

fn without_typing(mut entries: Vec<InboundMessage>) -> Vec<InboundMessage> {
    entries.retain(|m| !m.is_typing());
    entries
}

fn append_capped(mut entries: Vec<InboundMessage>, message: InboundMessage) -> Vec<InboundMessage> {
    entries.push(message);
    let excess = entries.len().saturating_sub(MAX_STORED_MESSAGES);
    entries.drain(..excess);
    entries
}

/// A message this client sent, as recorded for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Trimmed message text.
    pub text: String,
    /// Send time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Bounded list of locally sent messages.
///
/// Capped like [`MessageLog`] so a long session cannot grow without bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentLog {
    entries: Vec<SentMessage>,
}

impl SentLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sent message, evicting the oldest past the cap.
    pub fn push(&mut self, message: SentMessage) {
        self.entries.push(message);
        let excess = self.entries.len().saturating_sub(MAX_SENT_MESSAGES);
        self.entries.drain(..excess);
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[SentMessage] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been sent.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
