//! Parley core
//!
//! Pure state machines behind the relay client. Nothing in this crate performs
//! I/O or reads the clock: time is passed in by the caller and side effects are
//! returned as actions, so every component runs identically in tests and in
//! production.
//!
//! # Components
//!
//! - [`MessageLog`]: Bounded inbound log folded by a pure reducer
//! - [`view::build`]: Merges inbound and locally sent messages for display
//! - [`TypingIndicator`]: Outbound typing/clear/message sequencing with a
//!   debounce timer
//! - [`ReconnectPolicy`]: Exponential backoff for the stream client
//! - [`Environment`]: Clock and sleep abstraction for drivers

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod animation;
pub mod backoff;
pub mod env;
pub mod log;
pub mod status;
pub mod typing;
pub mod view;

pub use animation::TypingAnimation;
pub use backoff::{Backoff, ReconnectPolicy};
pub use env::Environment;
pub use log::{MessageLog, SentLog, SentMessage};
pub use status::ConnectionStatus;
pub use typing::{TypingAction, TypingIndicator, TypingSnapshot, TypingState};
pub use view::{MessageSender, UnifiedBody, UnifiedMessage};
