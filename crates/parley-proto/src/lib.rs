//! Parley wire protocol
//!
//! Message model and incremental frame parser for the Parley relay. Inbound
//! traffic arrives as a server-sent-event (SSE) stream of `data:` frames
//! carrying JSON messages; outbound traffic is one JSON message per HTTP POST.
//!
//! # Components
//!
//! - [`OutboundMessage`]: Messages the client sends (typing, message, command,
//!   clear, error)
//! - [`InboundMessage`]: Outbound shapes plus the `connection-established`
//!   lifecycle signal
//! - [`SseParser`]: Stateful parser turning arbitrary text chunks into
//!   messages
//!
//! This crate performs no I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod message;
pub mod sse;

pub use errors::{ProtocolError, Result};
pub use message::{
    ChatMessage, ClearMessage, ClearScope, CommandMessage, ConnectionEstablished, ErrorMessage,
    InboundMessage, MessageBase, MessageKind, OtherMessage, OutboundMessage, Priority,
    TypingMessage,
};
pub use sse::{SseParser, decode_frame, encode_frame};
